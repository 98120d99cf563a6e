//! Locates and parses the JSON object a tool prints after its last prompt.
//!
//! Payload grammar: everything from the first `{` to the end of the output,
//! with NUL, CR and LF characters removed. The tools print one JSON object,
//! but the terminal transport may split it across lines or pad it with NULs.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("tool output contains no JSON object")]
    NoPayload,

    #[error("malformed JSON payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The slice of `raw` starting at the first `{`, if any.
pub fn payload(raw: &str) -> Option<&str> {
    raw.find('{').map(|start| &raw[start..])
}

/// Remove NUL, CR and LF characters.
pub fn clean(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\0' | '\n' | '\r'))
        .collect()
}

pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let payload = payload(raw).ok_or(ExtractError::NoPayload)?;
    Ok(serde_json::from_str(&clean(payload))?)
}
