//! Error types for the tagprice-core library.
//!
//! The extraction pipeline itself never fails; these errors cover the
//! surfaces around it (configuration files and upstream responses).

use thiserror::Error;

/// Main error type for the tagprice library.
#[derive(Error, Debug)]
pub enum TagPriceError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upstream recognizer error.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configured zero-price sentinel is not a canonical price.
    #[error("zero price sentinel {0:?} is not a canonical price")]
    NonCanonicalZeroPrice(String),

    /// The configured unknown-label sentinel is blank.
    #[error("unknown label sentinel must not be empty")]
    EmptyUnknownLabel,

    /// Digit completion would never pad anything.
    #[error("completion width {width} must exceed completion max digits {max_digits}")]
    CompletionWidth { width: usize, max_digits: usize },

    /// Completion fill contains something other than ASCII digits.
    #[error("completion fill {0:?} must contain only ASCII digits")]
    CompletionFill(String),
}

/// Failure indications surfaced by the external recognition service.
///
/// The pipeline treats every variant the same way as an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The service rejected the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The service answered with an error payload.
    #[error("recognizer error: {0}")]
    Api(String),

    /// The service answered without any content.
    #[error("empty response")]
    EmptyResponse,

    /// The response body was not a recognizable completion envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for the tagprice library.
pub type Result<T> = std::result::Result<T, TagPriceError>;
