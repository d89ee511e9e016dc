//! Core library for price-tag recognition result normalization.
//!
//! An external image-understanding service reads a photographed price tag
//! and answers with text that is sometimes JSON, sometimes broken JSON and
//! sometimes prose. This crate turns any such text into a [`CanonicalRecord`]
//! holding an item label and a tax-included price:
//! - strict structured decoding of the expected response shape
//! - ordered regex fallback rules for labels and prices
//! - price normalization with digit completion for truncated numerals
//! - final validation with safe defaults

pub mod error;
pub mod models;
pub mod extraction;
pub mod upstream;

pub use error::{ConfigError, TagPriceError, UpstreamError, Result};
pub use models::config::{Defaults, ExtractionConfig, TagPriceConfig};
pub use models::record::{CanonicalRecord, ExtractedFields, ItemEnvelope};
pub use extraction::{ExtractionResult, ExtractionSource, PriceTagParser};
