//! Tax-included price extraction and normalization.

use super::patterns::{
    CANONICAL_PRICE_SEARCH, CURRENCY, LOOSE_TAX_INCLUDED, NUMERAL, POSTFIX_TAX_INCLUDED,
    QUOTED_PRICE, TAX_EXCLUDED, TAX_INCLUDED,
};
use super::{all_matches, first_match, fold_width, unescape_json_str, ExtractionMatch, FieldExtractor, Rule};

/// Numerals with at most this many digits are assumed to be truncated by
/// the recognizer (`49` read from a cramped `49,800`).
pub const COMPLETION_MAX_DIGITS: usize = 2;

/// Truncated numerals are right-padded to this many digits.
pub const COMPLETION_WIDTH: usize = 5;

/// Digits that follow a truncated numeral of exactly
/// [`COMPLETION_MAX_DIGITS`] digits (`49` -> `49800`); zeros fill the rest.
/// Shorter numerals are padded with zeros only (`7` -> `70000`).
pub const COMPLETION_FILL: &str = "800";

/// Price rules in priority order. Every rule is anchored on the
/// tax-included marker or rejects tax-excluded values.
pub const PRICE_RULES: &[Rule] = &[
    Rule { name: "canonical_triple", apply: canonical_triple },
    Rule { name: "quoted_price_key", apply: quoted_price },
    Rule { name: "loose_tax_included", apply: loose_tax_included },
    Rule { name: "postfix_tax_included", apply: postfix_tax_included },
];

/// `税込49,800円` verbatim.
pub fn canonical_triple(text: &str) -> Option<ExtractionMatch<String>> {
    let m = CANONICAL_PRICE_SEARCH.find(text)?;

    Some(
        ExtractionMatch::new(m.as_str().to_string(), 0.95, m.as_str())
            .with_position(m.start(), m.end()),
    )
}

/// `"価格": "<value>"`, as long as the value carries a numeral and is not
/// a tax-excluded figure.
pub fn quoted_price(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = QUOTED_PRICE.captures(text)?;
    let full_match = caps.get(0)?;
    let value = unescape_json_str(&caps[1]).trim().to_string();

    if !NUMERAL.is_match(&fold_width(&value)) || is_tax_excluded(&value) {
        return None;
    }

    Some(
        ExtractionMatch::new(value, 0.85, full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}

/// `税込 49800円`, `税込：49 800` and other loosely written figures.
pub fn loose_tax_included(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = LOOSE_TAX_INCLUDED.captures(text)?;
    let full_match = caps.get(0)?;
    let numeral: String = caps[1].chars().filter(|c| !matches!(c, ' ' | '\t')).collect();

    Some(
        ExtractionMatch::new(format!("{}{}", TAX_INCLUDED, numeral), 0.7, full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}

/// `49,800円(税込)`: the marker written after the figure.
pub fn postfix_tax_included(text: &str) -> Option<ExtractionMatch<String>> {
    POSTFIX_TAX_INCLUDED.captures_iter(text).find_map(|caps| {
        let numeral = caps.get(1)?;
        if preceded_by_tax_excluded(text, numeral.start()) {
            return None;
        }

        let full_match = caps.get(0)?;
        Some(
            ExtractionMatch::new(
                format!("{}{}", TAX_INCLUDED, numeral.as_str()),
                0.65,
                full_match.as_str(),
            )
            .with_position(full_match.start(), full_match.end()),
        )
    })
}

/// Whether the figure starting at `at` directly follows a tax-excluded marker.
fn preceded_by_tax_excluded(text: &str, at: usize) -> bool {
    let before = text[..at].trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '：'));
    TAX_EXCLUDED.iter().any(|marker| before.ends_with(marker))
}

/// A figure marked tax-excluded and not also marked tax-included.
fn is_tax_excluded(text: &str) -> bool {
    !text.contains(TAX_INCLUDED) && TAX_EXCLUDED.iter().any(|marker| text.contains(marker))
}

/// Price field extractor.
pub struct PriceExtractor;

impl PriceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(PRICE_RULES, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        all_matches(PRICE_RULES, text)
    }
}

/// Converts raw price text into `税込<grouped digits>円`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceNormalizer {
    max_digits: usize,
    width: usize,
    fill: String,
}

impl PriceNormalizer {
    /// Create a normalizer with the default completion thresholds.
    pub fn new() -> Self {
        Self {
            max_digits: COMPLETION_MAX_DIGITS,
            width: COMPLETION_WIDTH,
            fill: COMPLETION_FILL.to_string(),
        }
    }

    /// Set the digit-completion thresholds.
    pub fn with_completion(mut self, max_digits: usize, width: usize) -> Self {
        self.max_digits = max_digits;
        self.width = width;
        self
    }

    /// Set the padding digits; an empty fill pads with zeros only.
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Normalize raw price text. `None` means no usable numeral was found.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let folded = fold_width(raw);

        let numeral = match folded.find(TAX_INCLUDED) {
            Some(start) => match NUMERAL.find(&folded[start + TAX_INCLUDED.len()..]) {
                Some(m) => m.as_str(),
                // Marker after the figure: 49,800円(税込)
                None => {
                    let before = &folded[..start];
                    let m = NUMERAL.find_iter(before).last()?;
                    if preceded_by_tax_excluded(before, m.start()) {
                        return None;
                    }
                    m.as_str()
                }
            },
            None if is_tax_excluded(&folded) => return None,
            None => NUMERAL.find(&folded)?.as_str(),
        };

        let mut digits: String = numeral.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }

        digits = self.complete(digits);

        let significant = digits.trim_start_matches('0');
        let significant = if significant.is_empty() { "0" } else { significant };

        Some(format!("{}{}{}", TAX_INCLUDED, format_grouped(significant), CURRENCY))
    }

    fn complete(&self, mut digits: String) -> String {
        // A zero price is a reading, not a truncation.
        if digits.len() > self.max_digits || digits.bytes().all(|b| b == b'0') {
            return digits;
        }

        let fill = if digits.len() == self.max_digits { self.fill.as_str() } else { "" };
        let missing = self.width.saturating_sub(digits.len());
        digits.extend(
            fill.chars()
                .filter(char::is_ascii_digit)
                .chain(std::iter::repeat('0'))
                .take(missing),
        );
        digits
    }
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize with the default completion thresholds.
pub fn normalize_price(raw: &str) -> Option<String> {
    PriceNormalizer::new().normalize(raw)
}

/// Group a digit string by thousands (1234567 -> 1,234,567).
pub fn format_grouped(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::with_capacity(chars.len() + chars.len() / 3);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    formatted
}
