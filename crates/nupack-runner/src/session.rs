//! Prompt sequencer: answers a tool's interactive questions in a fixed order.
//!
//! The session is generic over its byte streams so it can be driven by a
//! child process's pipes or by in-memory streams in tests.
//!
//! States: `Spawned -> Prompting(i) -> Harvesting -> Closed`. Any failure moves
//! straight to `Closed { success: false }` and the session cannot be reused.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{timeout, timeout_at, Instant};
use tracing::debug;

use nupack_common::NupackError;

use crate::script::PromptScript;
use crate::Result;

const READ_CHUNK: usize = 4096;
const DEFAULT_OUTPUT_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Spawned,
    /// Waiting for, or answering, the step with this index.
    Prompting(usize),
    Harvesting,
    Closed { success: bool },
}

pub struct PromptSession<R, W> {
    tool: String,
    reader: R,
    /// Dropped when harvesting starts so the tool sees end of input.
    writer: Option<W>,
    buffer: Vec<u8>,
    /// Bytes of `buffer` already matched by a prompt.
    consumed: usize,
    state: SessionState,
    prompt_timeout: Duration,
    /// Most bytes of tool output the session will hold.
    output_limit: usize,
    responses_sent: usize,
}

impl<R, W> PromptSession<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(tool: impl Into<String>, reader: R, writer: W, prompt_timeout: Duration) -> Self {
        Self {
            tool: tool.into(),
            reader,
            writer: Some(writer),
            buffer: Vec::new(),
            consumed: 0,
            state: SessionState::Spawned,
            prompt_timeout,
            output_limit: DEFAULT_OUTPUT_LIMIT,
            responses_sent: 0,
        }
    }

    pub fn with_output_limit(mut self, bytes: usize) -> Self {
        self.output_limit = bytes;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn responses_sent(&self) -> usize {
        self.responses_sent
    }

    /// Output received but not yet matched by a prompt.
    pub fn transcript(&self) -> String {
        String::from_utf8_lossy(&self.buffer[self.consumed..]).into_owned()
    }

    /// Answer every step of `script` in order.
    pub async fn run_script(&mut self, script: &PromptScript) -> Result<()> {
        if self.state != SessionState::Spawned {
            return Err(self.fail(format!("cannot run a script in state {:?}", self.state), false));
        }

        for (i, step) in script.iter().enumerate() {
            self.state = SessionState::Prompting(i);
            self.expect(step.prompt).await?;
            debug!(tool = %self.tool, step = i, prompt = step.prompt, "prompt matched");
            self.send_line(&step.response).await?;
        }
        Ok(())
    }

    /// Close the tool's input and read the rest of its output until end of stream.
    /// Returns the text following the last matched prompt.
    pub async fn harvest(&mut self, limit: Duration) -> Result<String> {
        if matches!(self.state, SessionState::Closed { .. } | SessionState::Harvesting) {
            return Err(self.fail(format!("cannot harvest in state {:?}", self.state), false));
        }
        self.state = SessionState::Harvesting;
        drop(self.writer.take());

        let deadline = Instant::now() + limit;
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let read = timeout_at(deadline, self.reader.read(&mut chunk)).await;
            match read {
                Ok(Ok(0)) => return Ok(self.transcript()),
                Ok(Ok(n)) => self.append(&chunk[..n])?,
                Ok(Err(e)) => return Err(self.fail(format!("reading output failed: {}", e), false)),
                Err(_) => return Err(self.fail(format!("output did not end within {:?}", limit), true)),
            }
        }
    }

    /// Mark the session finished. Called by the owner once the process is closed.
    pub fn finish(&mut self, success: bool) {
        self.state = SessionState::Closed { success };
    }

    async fn expect(&mut self, prompt: &str) -> Result<()> {
        let needle = prompt.as_bytes();
        let deadline = Instant::now() + self.prompt_timeout;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if let Some(pos) = find(&self.buffer[self.consumed..], needle) {
                self.consumed += pos + needle.len();
                return Ok(());
            }

            let read = timeout_at(deadline, self.reader.read(&mut chunk)).await;
            match read {
                Ok(Ok(0)) => {
                    return Err(self.fail(format!("output closed while waiting for {:?}", prompt), false));
                }
                Ok(Ok(n)) => self.append(&chunk[..n])?,
                Ok(Err(e)) => {
                    return Err(self.fail(format!("reading output failed while waiting for {:?}: {}", prompt, e), false));
                }
                Err(_) => {
                    return Err(self.fail(
                        format!("timed out after {:?} waiting for {:?}", self.prompt_timeout, prompt),
                        true,
                    ));
                }
            }
        }
    }

    async fn send_line(&mut self, line: &str) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(self.fail("input already closed".to_string(), false));
        };

        let write = async {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        };

        let outcome = timeout(self.prompt_timeout, write).await;
        match outcome {
            Ok(Ok(())) => {
                self.responses_sent += 1;
                Ok(())
            }
            Ok(Err(e)) => Err(self.fail(format!("writing response failed: {}", e), false)),
            Err(_) => Err(self.fail(format!("timed out after {:?} writing response", self.prompt_timeout), true)),
        }
    }

    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if self.buffer.len() + bytes.len() > self.output_limit {
            let limit = self.output_limit;
            return Err(self.fail(format!("output exceeded {} bytes", limit), false));
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn fail(&mut self, reason: String, timed_out: bool) -> NupackError {
        let step = self.state;
        self.state = SessionState::Closed { success: false };
        NupackError::Interaction {
            tool: self.tool.clone(),
            reason: format!("{} ({:?})", reason, step),
            timed_out,
            transcript: self.transcript(),
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
