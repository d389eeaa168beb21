//! Locating verification challenges in API responses.
//!
//! Moltbook embeds its "proof of understanding" challenge at no fixed place
//! in a mutation response, so the extractor walks the whole JSON tree.

use serde_json::Value;

/// A single-use arithmetic challenge guarding a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub code: String,
    pub challenge_text: String,
}

/// Depth-first search for a `verification` object carrying both a
/// `verification_code` and a `challenge_text`.
///
/// Returns the first match in traversal order. `None` means the mutation
/// completed without a challenge — that is the fast path, not an error.
pub fn find_challenge(data: &Value) -> Option<Challenge> {
    match data {
        Value::Object(map) => {
            if let Some(Value::Object(candidate)) = map.get("verification")
                && let Some(code) = candidate.get("verification_code").and_then(Value::as_str)
                && let Some(text) = candidate.get("challenge_text").and_then(Value::as_str)
            {
                return Some(Challenge {
                    code: code.to_string(),
                    challenge_text: text.to_string(),
                });
            }
            map.values().find_map(find_challenge)
        }
        Value::Array(items) => items.iter().find_map(find_challenge),
        _ => None,
    }
}
