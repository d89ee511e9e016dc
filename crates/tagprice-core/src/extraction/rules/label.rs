//! Item label extraction and cleanup.

use super::patterns::{
    ACCESSORY_NOTE, BRACKETED_NOISE, BRAND_LABEL, CONDITION_WORD, QUOTED_LABEL, WHITESPACE_RUN,
};
use super::{all_matches, first_match, unescape_json_str, ExtractionMatch, FieldExtractor, Rule};

/// Label rules in priority order.
pub const LABEL_RULES: &[Rule] = &[
    Rule { name: "quoted_label_key", apply: quoted_label },
    Rule { name: "brand_token", apply: brand_label },
];

/// `"名前": "<value>"` anywhere in the text, including broken JSON.
pub fn quoted_label(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = QUOTED_LABEL.captures(text)?;
    let full_match = caps.get(0)?;
    let value = unescape_json_str(&caps[1]).trim().to_string();

    if value.is_empty() {
        return None;
    }

    Some(
        ExtractionMatch::new(value, 0.9, full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}

/// A known manufacturer plus the model designation that follows it.
pub fn brand_label(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = BRAND_LABEL.captures(text)?;
    let label_match = caps.get(1)?;
    let value = label_match
        .as_str()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '/' | '.' | '(' | '+'))
        .to_string();

    Some(
        ExtractionMatch::new(value, 0.6, label_match.as_str())
            .with_position(label_match.start(), label_match.end()),
    )
}

/// Label field extractor.
pub struct LabelExtractor;

impl LabelExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LabelExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LabelExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(LABEL_RULES, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        all_matches(LABEL_RULES, text)
    }
}

/// Strip condition grades and accessory notes from a label.
///
/// The result may be empty; the validator substitutes the unknown label
/// in that case.
pub fn clean_label(label: &str) -> String {
    let cleaned = BRACKETED_NOISE.replace_all(label, " ");
    let cleaned = ACCESSORY_NOTE.replace_all(&cleaned, " ");
    let cleaned = CONDITION_WORD.replace_all(&cleaned, " ");

    WHITESPACE_RUN.replace_all(&cleaned, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quoted_label_in_broken_json() {
        let text = r#"```json
{ "商品": { "名前": "  CONTAX S2 (60years) Body ", "価格": "税込49,8"#;

        let m = quoted_label(text).unwrap();
        assert_eq!(m.value, "CONTAX S2 (60years) Body");
        assert!(m.position.is_some());
    }

    #[test]
    fn test_quoted_label_skips_empty_value() {
        assert!(quoted_label(r#"{"名前": "   "}"#).is_none());
    }

    #[test]
    fn test_brand_label_from_prose() {
        let m = brand_label("このカードには Canon AE-1 Program ボディ 税込19,800円 とあります").unwrap();
        assert_eq!(m.value, "Canon AE-1 Program");
    }

    #[test]
    fn test_brand_label_japanese_name() {
        let m = brand_label("ニコン F3 HP\n税込88,000円").unwrap();
        assert_eq!(m.value, "ニコン F3 HP");
    }

    #[test]
    fn test_brand_label_is_bounded() {
        let text = format!("Leica {}", "M".repeat(100));
        let m = brand_label(&text).unwrap();
        assert!(m.value.len() <= "Leica".len() + 40);
    }

    #[test]
    fn test_extractor_prefers_quoted_key() {
        let text = r#"Nikon F3 ... "名前": "Leica M6""#;
        let m = LabelExtractor::new().extract(text).unwrap();

        assert_eq!(m.value, "Leica M6");
        assert_eq!(m.rule, "quoted_label_key");
        assert_eq!(LabelExtractor::new().extract_all(text).len(), 2);
    }

    #[test]
    fn test_extractor_without_label() {
        assert!(LabelExtractor::new().extract("税込49,800円").is_none());
    }

    #[test]
    fn test_clean_label() {
        assert_eq!(clean_label("Nikon F3 HP 【美品】"), "Nikon F3 HP");
        assert_eq!(clean_label("中古 Canon AE-1 (元箱付)"), "Canon AE-1");
        assert_eq!(clean_label("Leica M6 AB品 付属品:ストラップ"), "Leica M6");
        assert_eq!(clean_label("CONTAX S2 (60years) Body"), "CONTAX S2 (60years) Body");
        assert_eq!(clean_label("ジャンク"), "");
    }
}
