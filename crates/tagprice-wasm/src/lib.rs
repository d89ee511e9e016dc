//! WASM bindings for the price-tag recognition result normalizer.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Every extraction entry point yields a record; only malformed configuration
//! is reported as an error.

use wasm_bindgen::prelude::*;

use tagprice_core::extraction::{ExtractionSource, PriceNormalizer};
use tagprice_core::upstream::content_from_completion;
use tagprice_core::{CanonicalRecord, PriceTagParser, TagPriceConfig, UpstreamError};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract `{label, price}` from recognizer output.
#[wasm_bindgen]
pub fn extract_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&PriceTagParser::new().extract(text))
}

/// Extract `{label, price}` from a raw chat-completions response body.
#[wasm_bindgen]
pub fn extract_from_completion(body: &str) -> Result<JsValue, JsValue> {
    let result = PriceTagParser::new().parse_upstream(content_from_completion(body));
    to_js(&result.record)
}

/// Record to use when the recognition request itself failed.
#[wasm_bindgen]
pub fn extract_from_upstream_error(message: &str) -> Result<JsValue, JsValue> {
    let result = PriceTagParser::new()
        .parse_upstream::<String>(Err(UpstreamError::Transport(message.to_string())));
    to_js(&result.record)
}

/// Normalize a price fragment to `税込N,NNN円`, if it holds a tax-included price.
#[wasm_bindgen]
pub fn normalize_price(text: &str) -> Option<String> {
    PriceNormalizer::new().normalize(text)
}

/// Whether a string is a price in canonical form.
#[wasm_bindgen]
pub fn is_canonical_price(price: &str) -> bool {
    tagprice_core::extraction::is_canonical_price(price)
}

/// Price-tag extractor class for browser use.
#[wasm_bindgen]
pub struct TagPriceExtractor {
    parser: PriceTagParser,
}

#[wasm_bindgen]
impl TagPriceExtractor {
    /// Create a new extractor with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: PriceTagParser::new(),
        }
    }

    /// Create an extractor from a configuration object.
    #[wasm_bindgen]
    pub fn with_config(config: JsValue) -> Result<TagPriceExtractor, JsValue> {
        let config: TagPriceConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            parser: PriceTagParser::from_config(&config),
        })
    }

    /// Configure stripping of condition and accessory phrases from labels.
    #[wasm_bindgen]
    pub fn set_strip_condition_phrases(&mut self, strip: bool) {
        let parser = std::mem::take(&mut self.parser);
        self.parser = parser.with_condition_stripping(strip);
    }

    /// Extract `{label, price}` from recognizer output.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract(text))
    }

    /// Extract `{"商品": {"名前", "価格"}}` from recognizer output.
    #[wasm_bindgen]
    pub fn extract_envelope(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract(text).to_envelope())
    }

    /// Get extraction result with metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);

        #[derive(serde::Serialize)]
        struct ExtractResult {
            record: CanonicalRecord,
            source: ExtractionSource,
            warnings: Vec<String>,
        }

        let output = ExtractResult {
            record: result.record,
            source: result.source,
            warnings: result.warnings,
        };

        to_js(&output)
    }
}

impl Default for TagPriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_normalize_price() {
        assert_eq!(normalize_price("税込 49,800円").as_deref(), Some("税込49,800円"));
        assert_eq!(normalize_price("税込49").as_deref(), Some("税込49,800円"));
        assert_eq!(normalize_price("税抜49,800円"), None);
    }

    #[wasm_bindgen_test]
    fn test_is_canonical_price() {
        assert!(is_canonical_price("税込1,234,567円"));
        assert!(!is_canonical_price("税込1234円"));
        assert!(!is_canonical_price("49,800円"));
    }
}
