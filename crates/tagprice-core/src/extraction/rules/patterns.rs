//! Common markers and regex patterns for price-tag extraction.
//!
//! Digit classes are spelled `[0-9]` rather than `\d`: the regex crate's
//! `\d` is Unicode-aware and would accept full-width digits, which are
//! folded to ASCII before matching instead.

use lazy_static::lazy_static;
use regex::Regex;

/// Marks a tax-included figure.
pub const TAX_INCLUDED: &str = "税込";

/// Markers of tax-excluded figures, which are never selected.
pub const TAX_EXCLUDED: [&str; 3] = ["税抜", "税別", "本体価格"];

/// Currency suffix of a canonical price.
pub const CURRENCY: &str = "円";

/// Label member name in the recognizer's response shape.
pub const LABEL_KEY: &str = "名前";

/// Price member name in the recognizer's response shape.
pub const PRICE_KEY: &str = "価格";

lazy_static! {
    // Canonical price, anchored (税込49,800円)
    pub static ref CANONICAL_PRICE: Regex = Regex::new(
        r"^税込[0-9]{1,3}(?:,[0-9]{3})*円$"
    ).unwrap();

    // Canonical price anywhere in text
    pub static ref CANONICAL_PRICE_SEARCH: Regex = Regex::new(
        r"税込[0-9]{1,3}(?:,[0-9]{3})*円"
    ).unwrap();

    // Tax-included figure in prose (税込 49800円, 税込：49 800)
    pub static ref LOOSE_TAX_INCLUDED: Regex = Regex::new(
        r"税込\s*[:：]?\s*([0-9](?:[0-9,]|[ \t][0-9])*)"
    ).unwrap();

    // Quoted-key fragments of the response object, escapes allowed
    pub static ref QUOTED_LABEL: Regex = Regex::new(
        r#""名前"\s*:\s*"((?:[^"\\]|\\.)*)""#
    ).unwrap();

    pub static ref QUOTED_PRICE: Regex = Regex::new(
        r#""価格"\s*:\s*"((?:[^"\\]|\\.)*)""#
    ).unwrap();

    // First numeral: a well-formed thousands grouping, else a bare digit run
    pub static ref NUMERAL: Regex = Regex::new(
        r"[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+"
    ).unwrap();

    // Figure followed by the marker (49,800円(税込), 49800円 税込)
    pub static ref POSTFIX_TAX_INCLUDED: Regex = Regex::new(
        r"(?:^|[^0-9,])([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)\s*円?\s*\(?\s*税込"
    ).unwrap();

    // Known manufacturer followed by a short model designation on the same line
    pub static ref BRAND_LABEL: Regex = Regex::new(concat!(
        r"(?i)(?:^|[^A-Za-z0-9])(",
        r"(?:Canon|Nikon|Sony|Fujifilm|Fuji|OM\s?System|Olympus|Panasonic|Lumix|Pentax|Ricoh|",
        r"Leica|Contax|Hasselblad|Mamiya|Minolta|Konica|Sigma|Tamron|Tokina|Voigtl[aä]nder|",
        r"Zeiss|Yashica|Rollei|Bronica|Kyocera|Cosina|Kodak|Polaroid|",
        r"キヤノン|キャノン|ニコン|ソニー|富士フイルム|フジフイルム|オリンパス|パナソニック|",
        r"ペンタックス|リコー|ライカ|コンタックス|ハッセルブラッド|マミヤ|ミノルタ|シグマ|タムロン)",
        r"[A-Za-z0-9 \-./()+]{0,40})"
    )).unwrap();

    // Condition grades and accessory notes in brackets (【美品】, (元箱付))
    pub static ref BRACKETED_NOISE: Regex = Regex::new(
        r"[(（【\[]\s*(?:中古|美品|良品|並品|極上品|難あり|訳あり|ジャンク|AB品|A品|B品|C品|付属品|元箱|箱付|ケース付)[^)）】\]]*[)）】\]]"
    ).unwrap();

    // Bare condition grades
    pub static ref CONDITION_WORD: Regex = Regex::new(
        r"中古品?|美品|良品|並品|極上品|難あり|訳あり|ジャンク品?|AB品|A品|B品|C品"
    ).unwrap();

    // Accessory notes running to the next whitespace (付属品:ストラップ)
    pub static ref ACCESSORY_NOTE: Regex = Regex::new(
        r"(?:付属品|元箱|箱付き?|ケース付き?)\S*"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_price_is_anchored() {
        assert!(CANONICAL_PRICE.is_match("税込49,800円"));
        assert!(CANONICAL_PRICE.is_match("税込0円"));
        assert!(CANONICAL_PRICE.is_match("税込1,234,567円"));
        assert!(!CANONICAL_PRICE.is_match(" 税込49,800円"));
        assert!(!CANONICAL_PRICE.is_match("税込49800円"));
        assert!(!CANONICAL_PRICE.is_match("税込49,80円"));
        assert!(!CANONICAL_PRICE.is_match("税込４９,８００円"));
        assert!(!CANONICAL_PRICE.is_match("税抜49,800円"));
    }

    #[test]
    fn test_canonical_search_skips_ungrouped() {
        assert!(CANONICAL_PRICE_SEARCH.find("税込1,2345円").is_none());
        assert_eq!(
            CANONICAL_PRICE_SEARCH.find("価格は税込12,000円です").unwrap().as_str(),
            "税込12,000円"
        );
    }

    #[test]
    fn test_numeral() {
        assert_eq!(NUMERAL.find("税込49,800円").unwrap().as_str(), "49,800");
        assert_eq!(NUMERAL.find("49800").unwrap().as_str(), "49800");
        assert_eq!(NUMERAL.find("約 7 点").unwrap().as_str(), "7");
        assert_eq!(NUMERAL.find("12,").unwrap().as_str(), "12");
        assert_eq!(NUMERAL.find("税込49,8").unwrap().as_str(), "49");
        assert_eq!(NUMERAL.find("49,80").unwrap().as_str(), "49");
        assert_eq!(NUMERAL.find("1,2345").unwrap().as_str(), "1,234");
        assert_eq!(NUMERAL.find("1,234,567円").unwrap().as_str(), "1,234,567");
        assert!(NUMERAL.find("不明").is_none());
    }

    #[test]
    fn test_postfix_tax_included() {
        let caps = POSTFIX_TAX_INCLUDED.captures("Nikon F3 49,800円(税込)").unwrap();
        assert_eq!(&caps[1], "49,800");

        let caps = POSTFIX_TAX_INCLUDED.captures("45,000円(税抜) 49,500円 税込").unwrap();
        assert_eq!(&caps[1], "49,500");

        assert!(POSTFIX_TAX_INCLUDED.captures("税込49,800円").is_none());
    }

    #[test]
    fn test_brand_label_requires_boundary() {
        let caps = BRAND_LABEL.captures("中古 Nikon F3 HP 税込").unwrap();
        assert_eq!(caps[1].trim(), "Nikon F3 HP");

        assert!(BRAND_LABEL.captures("xCanon").is_none());
    }
}
