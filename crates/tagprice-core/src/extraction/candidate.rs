//! Strict structured decoding of recognizer output.

use serde_json::Value;
use tracing::trace;

use crate::models::record::{ExtractedFields, ItemEnvelope};

/// Decode the result as `{"商品": {"名前": "...", "価格": "..."}}`.
///
/// Returns `None` for anything else: invalid JSON, trailing prose, a
/// different shape, missing members or non-string members. Extra members
/// are ignored.
pub fn parse_structured(raw: &str) -> Option<ExtractedFields> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            trace!("Result is not structured: {}", e);
            return None;
        }
    };

    // serde would also accept the positional form ["name", "price"]
    if !value.get("商品").is_some_and(Value::is_object) {
        trace!("Result has no item object");
        return None;
    }

    match serde_json::from_value::<ItemEnvelope>(value) {
        Ok(envelope) => Some(envelope.into()),
        Err(e) => {
            trace!("Result is not structured: {}", e);
            None
        }
    }
}
