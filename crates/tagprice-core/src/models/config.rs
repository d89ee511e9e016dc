//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::extraction::rules::price::{COMPLETION_FILL, COMPLETION_MAX_DIGITS, COMPLETION_WIDTH};
use crate::extraction::validator::is_canonical_price;

/// Label written when nothing usable was recognized.
pub const UNKNOWN_LABEL: &str = "不明";

/// Price written when nothing usable was recognized.
pub const ZERO_PRICE: &str = "税込0円";

/// Main configuration for the tagprice pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagPriceConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Sentinels substituted by the validator.
    pub defaults: Defaults,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Remove condition grades and accessory notes from labels.
    pub strip_condition_phrases: bool,

    /// Numerals with at most this many digits are treated as truncated.
    pub completion_max_digits: usize,

    /// Truncated numerals are right-padded to this many digits.
    pub completion_width: usize,

    /// Digits that follow a numeral of exactly `completion_max_digits`
    /// digits; zeros fill the rest. Empty pads with zeros only.
    pub completion_fill: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strip_condition_phrases: true,
            completion_max_digits: COMPLETION_MAX_DIGITS,
            completion_width: COMPLETION_WIDTH,
            completion_fill: COMPLETION_FILL.to_string(),
        }
    }
}

/// The recognized defaults used when a field cannot be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Substituted for absent or blank labels.
    pub unknown_label: String,

    /// Substituted for absent or non-canonical prices.
    pub zero_price: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            unknown_label: UNKNOWN_LABEL.to_string(),
            zero_price: ZERO_PRICE.to_string(),
        }
    }
}

impl TagPriceConfig {
    /// Load configuration from a JSON file and validate it.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that the configured sentinels and thresholds are usable.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.defaults.unknown_label.trim().is_empty() {
            return Err(ConfigError::EmptyUnknownLabel);
        }

        // Written by the validator without being re-checked.
        if !is_canonical_price(&self.defaults.zero_price) {
            return Err(ConfigError::NonCanonicalZeroPrice(
                self.defaults.zero_price.clone(),
            ));
        }

        if self.extraction.completion_width <= self.extraction.completion_max_digits {
            return Err(ConfigError::CompletionWidth {
                width: self.extraction.completion_width,
                max_digits: self.extraction.completion_max_digits,
            });
        }

        if !self.extraction.completion_fill.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::CompletionFill(
                self.extraction.completion_fill.clone(),
            ));
        }

        Ok(())
    }
}
