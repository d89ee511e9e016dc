//! End-to-end behaviour of the recognizer result parser.

use pretty_assertions::assert_eq;
use regex::Regex;

use tagprice_core::extraction::{normalize_price, parse_structured};
use tagprice_core::{
    upstream::content_from_completion, CanonicalRecord, ExtractionSource, PriceTagParser,
    UpstreamError,
};

fn price_shape() -> Regex {
    Regex::new(r"^税込[0-9]{1,3}(,[0-9]{3})*円$").unwrap()
}

fn assert_schema(record: &CanonicalRecord) {
    assert!(!record.label.trim().is_empty(), "blank label in {:?}", record);
    assert!(price_shape().is_match(&record.price), "bad price in {:?}", record);

    let value = serde_json::to_value(record).unwrap();
    let members = value.as_object().unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.contains_key("label"));
    assert!(members.contains_key("price"));
}

#[test]
fn every_input_yields_a_schema_conformant_record() {
    let parser = PriceTagParser::new();
    let garbage = String::from_utf8_lossy(&[0xff, 0xfe, 0x00, 0x7b, 0x22, 0xc3, 0x28, 0x0a]).into_owned();

    let inputs = [
        "",
        " ",
        "\0\0\0",
        garbage.as_str(),
        "{",
        "}",
        "null",
        "[]",
        "42",
        r#"{"商品": null}"#,
        r#"{"商品": {"名前": "", "価格": ""}}"#,
        r#"{"商品": {"名前": "   ", "価格": "税込"}}"#,
        r#"{"商品": {"名前": "\u0000", "価格": "税込99999999999999999999999999円"}}"#,
        r#""名前": "Pentax 67" "価格": "#,
        r#""価格": "税込,,,円""#,
        "税込",
        "税込円",
        "税込,円",
        "円円円 税込 税込 税抜",
        "Canon",
        "ジャンク 【付属品なし】",
        "価格は不明です",
        "税込１２３４５６７８９０円",
    ];

    for raw in inputs {
        let record = parser.extract(raw);
        assert_schema(&record);
    }
}

#[test]
fn prices_always_match_the_strict_shape() {
    let parser = PriceTagParser::new();

    for raw in [
        "税込49800円",
        "税込 1 234 567",
        "税込49,8000円",
        r#"{"商品": {"名前": "Nikon", "価格": "¥12,34"}}"#,
        r#"{"商品": {"名前": "Nikon", "価格": "1.5万円"}}"#,
    ] {
        assert_schema(&parser.extract(raw));
    }
}

#[test]
fn digit_completion() {
    assert_eq!(normalize_price("49").as_deref(), Some("税込49,800円"));
    assert_eq!(normalize_price("7").as_deref(), Some("税込70,000円"));
    assert_eq!(normalize_price("498").as_deref(), Some("税込498円"));
    assert_eq!(normalize_price("1234567").as_deref(), Some("税込1,234,567円"));

    // A grouping cut short by the recognizer completes like a bare numeral
    assert_eq!(normalize_price("税込49,8").as_deref(), Some("税込49,800円"));
    assert_eq!(normalize_price("49,80").as_deref(), Some("税込49,800円"));
    assert_eq!(normalize_price("1,2345").as_deref(), Some("税込1,234円"));

    let parser = PriceTagParser::new();
    let raw = r#"{"商品": {"名前": "Nikon F3", "価格": "税込49,8円"}}"#;
    assert_eq!(parser.extract(raw).price, "税込49,800円");
}

#[test]
fn postfix_tax_marker_is_recognized() {
    let parser = PriceTagParser::new();

    let raw = r#"{"商品": {"名前": "Nikon F3", "価格": "49,800円(税込)"}}"#;
    let result = parser.parse(raw);
    assert_eq!(result.source, ExtractionSource::Structured);
    assert_eq!(result.record.price, "税込49,800円");

    assert_eq!(parser.extract("Nikon F3 ４９，８００円（税込）").price, "税込49,800円");
    assert_eq!(parser.extract("45,000円(税抜) 49,500円(税込)").price, "税込49,500円");
    assert_eq!(parser.extract("税抜 45,000円 税込").price, "税込0円");
}

#[test]
fn tax_excluded_figures_are_never_selected() {
    let parser = PriceTagParser::new();

    for raw in [
        "税抜45,000円 / 税込49,800円",
        "税抜 45,000円 / 税込 49,800円",
        "税込49,800円（税抜45,000円）",
        r#"{"商品": {"名前": "Nikon F3", "価格": "税抜45,000円 / 税込49,800円"}}"#,
    ] {
        assert_eq!(parser.extract(raw).price, "税込49,800円", "input {:?}", raw);
    }

    assert_eq!(parser.extract("税抜45,000円").price, "税込0円");
}

#[test]
fn structured_results_take_precedence() {
    let raw = r#"{"商品": {"名前": "CONTAX S2", "価格": "税込49,800円"}}"#;
    assert!(parse_structured(raw).is_some());

    let result = PriceTagParser::new().parse(raw);
    assert_eq!(result.source, ExtractionSource::Structured);
    assert_eq!(
        result.record,
        CanonicalRecord {
            label: "CONTAX S2".to_string(),
            price: "税込49,800円".to_string(),
        }
    );
}

#[test]
fn empty_input_yields_all_defaults() {
    let result = PriceTagParser::new().parse("");

    assert_eq!(result.source, ExtractionSource::Empty);
    assert_eq!(
        result.record,
        CanonicalRecord {
            label: "不明".to_string(),
            price: "税込0円".to_string(),
        }
    );
}

#[test]
fn missing_label_is_defaulted_and_price_kept() {
    let record = PriceTagParser::new().extract("カードの価格は 税込 12800 円 と読めます");

    assert_eq!(record.label, "不明");
    assert_eq!(record.price, "税込12,800円");
}

#[test]
fn upstream_failures_behave_like_empty_input() {
    let parser = PriceTagParser::new();
    let empty = parser.extract("");

    let body = r#"{"error": {"message": "Incorrect API key provided", "code": "invalid_api_key"}}"#;
    let outcome = content_from_completion(body);
    assert!(matches!(outcome, Err(UpstreamError::Authentication(_))));

    let result = parser.parse_upstream(outcome);
    assert_eq!(result.record, empty);
}

#[test]
fn completion_body_round_trip() {
    let body = r#"{"choices": [{"message": {"content": "商品名: Hasselblad 500C/M\n価格: 税込 268,000円"}}]}"#;
    let result = PriceTagParser::new().parse_upstream(content_from_completion(body));

    assert_eq!(result.source, ExtractionSource::Fallback);
    assert_eq!(result.record.label, "Hasselblad 500C/M");
    assert_eq!(result.record.price, "税込268,000円");
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = std::sync::Arc::new(PriceTagParser::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || parser.extract(&format!("Nikon F{} 税込{}9,800円", i, i + 1)))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let record = handle.join().unwrap();
        assert_eq!(record.label, format!("Nikon F{}", i));
        assert_eq!(record.price, format!("税込{}9,800円", i + 1));
    }
}
