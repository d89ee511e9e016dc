//! Rule-based field extractors for recognizer output.

pub mod label;
pub mod price;
pub mod patterns;

pub use label::{clean_label, LabelExtractor, LABEL_RULES};
pub use price::{format_grouped, PriceExtractor, PriceNormalizer, PRICE_RULES};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
    /// Name of the rule that produced the match.
    pub rule: &'static str,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
            rule: "",
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_rule(mut self, rule: &'static str) -> Self {
        self.rule = rule;
        self
    }
}

/// One entry of an ordered rule table.
///
/// `apply` is a pure function of the text; `None` means the rule does not
/// apply and the next one is tried.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<ExtractionMatch<String>>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Evaluate rules in priority order and return the first match.
pub fn first_match(rules: &[Rule], text: &str) -> Option<ExtractionMatch<String>> {
    rules
        .iter()
        .find_map(|rule| (rule.apply)(text).map(|m| m.with_rule(rule.name)))
}

/// Evaluate every rule and collect all matches, in priority order.
pub fn all_matches(rules: &[Rule], text: &str) -> Vec<ExtractionMatch<String>> {
    rules
        .iter()
        .filter_map(|rule| (rule.apply)(text).map(|m| m.with_rule(rule.name)))
        .collect()
}

/// Fold full-width ASCII forms and the ideographic space to plain ASCII.
///
/// Recognizers reading Japanese tags often answer `４９，８００円`.
pub fn fold_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect()
}

/// Decode a captured JSON string body, keeping the raw text if the escapes
/// are broken.
pub(crate) fn unescape_json_str(body: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", body)).unwrap_or_else(|_| body.to_string())
}
