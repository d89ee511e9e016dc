//! Record types flowing through the extraction pipeline.

use serde::{Deserialize, Serialize};

/// The validated two-field result handed back to callers.
///
/// Serializes as an object with exactly the members `label` and `price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanonicalRecord {
    /// Item label, never blank.
    pub label: String,

    /// Tax-included price such as `税込49,800円`.
    pub price: String,
}

impl CanonicalRecord {
    /// Convert into the recognizer's own response shape.
    pub fn to_envelope(&self) -> ItemEnvelope {
        ItemEnvelope {
            item: EnvelopeItem {
                name: self.label.clone(),
                price: self.price.clone(),
            },
        }
    }
}

/// Unvalidated fields recovered from a recognizer result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Recovered label, if any.
    pub label: Option<String>,

    /// Any numeral-bearing price text, not yet canonical.
    pub price_text: Option<String>,
}

impl ExtractedFields {
    pub fn new(label: Option<String>, price_text: Option<String>) -> Self {
        Self { label, price_text }
    }

    /// True when neither field was recovered.
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.price_text.is_none()
    }
}

/// `{"商品": {"名前": ..., "価格": ...}}`, the shape the recognizer is
/// prompted to answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEnvelope {
    #[serde(rename = "商品")]
    pub item: EnvelopeItem,
}

/// Inner object of [`ItemEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeItem {
    #[serde(rename = "名前")]
    pub name: String,

    #[serde(rename = "価格")]
    pub price: String,
}

impl From<ItemEnvelope> for ExtractedFields {
    fn from(envelope: ItemEnvelope) -> Self {
        Self::new(Some(envelope.item.name), Some(envelope.item.price))
    }
}
