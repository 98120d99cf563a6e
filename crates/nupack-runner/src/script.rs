//! Ordered question/answer pairs for one tool invocation.

/// Wait for `prompt` to appear on the tool's output, then answer with `response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStep {
    pub prompt: &'static str,
    pub response: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptScript {
    steps: Vec<PromptStep>,
}

impl PromptScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, prompt: &'static str, response: impl Into<String>) -> Self {
        self.steps.push(PromptStep {
            prompt,
            response: response.into(),
        });
        self
    }

    /// One step per value, all answering the same prompt.
    pub fn repeat<I, S>(mut self, prompt: &'static str, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for response in responses {
            self = self.step(prompt, response.as_ref());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptStep> {
        self.steps.iter()
    }

    pub fn responses(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.response.as_str()).collect()
    }

    pub fn prompts(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.prompt).collect()
    }
}
