//! Recognizer result parser wiring the extraction stages together.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::UpstreamError;
use crate::models::config::{Defaults, TagPriceConfig};
use crate::models::record::{CanonicalRecord, ExtractedFields};

use super::candidate::parse_structured;
use super::fallback::FallbackExtractor;
use super::rules::{clean_label, PriceNormalizer};
use super::validator::RecordValidator;

/// Which stage produced the fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// The result decoded as the expected JSON shape.
    Structured,
    /// The fallback rules recovered at least one field.
    Fallback,
    /// Nothing was recovered; the record holds defaults only.
    Empty,
}

impl ExtractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Fallback => "fallback",
            Self::Empty => "empty",
        }
    }
}

/// Result of parsing one recognizer result.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// The validated record.
    pub record: CanonicalRecord,
    /// Stage that produced the fields.
    pub source: ExtractionSource,
    /// Extraction warnings (defaults substituted, prices rejected).
    pub warnings: Vec<String>,
}

/// Turns any recognizer output into a [`CanonicalRecord`].
///
/// Parsing is a pure function of the input text; a parser can be shared
/// freely between threads.
pub struct PriceTagParser {
    fallback: FallbackExtractor,
    normalizer: PriceNormalizer,
    validator: RecordValidator,
    /// Whether to strip condition and accessory phrases from labels.
    strip_condition_phrases: bool,
}

impl PriceTagParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            fallback: FallbackExtractor::new(),
            normalizer: PriceNormalizer::new(),
            validator: RecordValidator::default(),
            strip_condition_phrases: true,
        }
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &TagPriceConfig) -> Self {
        let extraction = &config.extraction;

        Self::new()
            .with_condition_stripping(extraction.strip_condition_phrases)
            .with_normalizer(
                PriceNormalizer::new()
                    .with_completion(extraction.completion_max_digits, extraction.completion_width)
                    .with_fill(extraction.completion_fill.clone()),
            )
            .with_defaults(config.defaults.clone())
    }

    /// Set label cleanup.
    pub fn with_condition_stripping(mut self, strip: bool) -> Self {
        self.strip_condition_phrases = strip;
        self
    }

    /// Set the price normalizer.
    pub fn with_normalizer(mut self, normalizer: PriceNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Set the sentinels used by the validator.
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.validator = RecordValidator::new(defaults);
        self
    }

    /// Parse a recognizer result.
    pub fn parse(&self, raw: &str) -> ExtractionResult {
        info!("Parsing recognizer result of {} characters", raw.len());

        let (fields, source) = match parse_structured(raw) {
            Some(fields) => {
                debug!("Result decoded as structured item");
                (fields, ExtractionSource::Structured)
            }
            None => self.recover(raw),
        };

        let result = self.finish(fields, source);

        if !result.warnings.is_empty() {
            debug!("Extraction warnings: {:?}", result.warnings);
        }
        debug!(
            "Extracted {:?} / {:?} via {}",
            result.record.label,
            result.record.price,
            result.source.as_str()
        );

        result
    }

    /// Parse the outcome of a recognizer call. Any failure is handled as an
    /// empty result, so the caller still receives a record.
    pub fn parse_upstream<S: AsRef<str>>(
        &self,
        outcome: std::result::Result<S, UpstreamError>,
    ) -> ExtractionResult {
        match outcome {
            Ok(raw) => self.parse(raw.as_ref()),
            Err(e) => {
                warn!("Recognizer failed, using defaults: {}", e);
                let mut result = self.parse("");
                result.warnings.insert(0, format!("Upstream failure: {}", e));
                result
            }
        }
    }

    /// Parse and keep only the record.
    pub fn extract(&self, raw: &str) -> CanonicalRecord {
        self.parse(raw).record
    }

    fn recover(&self, raw: &str) -> (ExtractedFields, ExtractionSource) {
        let matches = self.fallback.extract_matches(raw);

        if let Some(m) = &matches.label {
            debug!("Label recovered by rule {} from {:?}", m.rule, m.source);
        }
        if let Some(m) = &matches.price {
            debug!("Price recovered by rule {} from {:?}", m.rule, m.source);
        }

        let fields = ExtractedFields::from(matches);
        let source = if fields.is_empty() {
            ExtractionSource::Empty
        } else {
            ExtractionSource::Fallback
        };

        (fields, source)
    }

    fn finish(&self, fields: ExtractedFields, source: ExtractionSource) -> ExtractionResult {
        let mut warnings = Vec::new();

        let label = fields.label.map(|label| {
            if self.strip_condition_phrases {
                clean_label(&label)
            } else {
                label
            }
        });

        let price = fields.price_text.and_then(|text| {
            let normalized = self.normalizer.normalize(&text);
            if normalized.is_none() {
                warnings.push(format!("Could not normalize price text {:?}", text));
            }
            normalized
        });

        let (record, validation_warnings) = self.validator.validate_with_warnings(label, price);
        warnings.extend(validation_warnings);

        ExtractionResult {
            record,
            source,
            warnings,
        }
    }
}

impl Default for PriceTagParser {
    fn default() -> Self {
        Self::new()
    }
}
