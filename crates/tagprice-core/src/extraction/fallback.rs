//! Pattern-based recovery for results that are not structured.

use crate::models::record::ExtractedFields;

use super::rules::{fold_width, ExtractionMatch, FieldExtractor, LabelExtractor, PriceExtractor};

/// Label and price matches recovered from raw text.
#[derive(Debug, Clone, Default)]
pub struct FallbackMatches {
    pub label: Option<ExtractionMatch<String>>,
    pub price: Option<ExtractionMatch<String>>,
}

impl From<FallbackMatches> for ExtractedFields {
    fn from(matches: FallbackMatches) -> Self {
        Self::new(
            matches.label.map(|m| m.value),
            matches.price.map(|m| m.value),
        )
    }
}

/// Runs the label and price rule tables over raw recognizer output.
#[derive(Default)]
pub struct FallbackExtractor {
    label: LabelExtractor,
    price: PriceExtractor,
}

impl FallbackExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recover whatever fields the rules can find. Never fails.
    pub fn extract(&self, raw: &str) -> ExtractedFields {
        self.extract_matches(raw).into()
    }

    /// Like [`extract`](Self::extract) but keeps the rule metadata.
    pub fn extract_matches(&self, raw: &str) -> FallbackMatches {
        let text = fold_width(raw);

        FallbackMatches {
            label: self.label.extract(&text),
            price: self.price.extract(&text),
        }
    }
}
