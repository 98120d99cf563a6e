//! Response bodies returned to HTTP clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outer object wrapping every successful tool run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub license: String,
    /// Exit code of the tool process.
    pub status: i32,
    /// The JSON object printed by the tool; its schema is the tool's own.
    pub result: Value,
}

impl Envelope {
    pub fn assemble(license: &str, status: i32, result: Value) -> Self {
        Self {
            license: license.to_string(),
            status,
            result,
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub usage: String,
    pub homepage: String,
    pub license: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_envelope_has_exactly_three_keys() {
        let env = Envelope::assemble("terms", 0, json!({ "energy": -12.5 }));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(
            value,
            json!({ "license": "terms", "status": 0, "result": { "energy": -12.5 } })
        );
    }

    #[test]
    fn test_result_is_passed_through_untouched() {
        let result = json!({ "complexes": [[1, 2], [1, 3]], "nested": { "k": null } });
        let env = Envelope::assemble("", 0, result.clone());
        assert_eq!(env.result, result);
    }
}
