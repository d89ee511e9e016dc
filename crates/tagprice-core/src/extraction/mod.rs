//! Label and price extraction from recognizer output.
//!
//! Stages, in order: [`candidate`] (strict decode), [`fallback`] (pattern
//! rules), price normalization in [`rules::price`], and [`validator`].

pub mod candidate;
pub mod fallback;
mod pipeline;
pub mod rules;
pub mod validator;

pub use candidate::parse_structured;
pub use fallback::{FallbackExtractor, FallbackMatches};
pub use pipeline::{ExtractionResult, ExtractionSource, PriceTagParser};
pub use rules::price::{normalize_price, PriceNormalizer};
pub use validator::{is_canonical_price, RecordValidator};
