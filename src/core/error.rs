//! Error types for quote fetching and report generation.

use thiserror::Error;

/// Failures surfaced by the quote client and the report renderer.
#[derive(Error, Debug)]
pub enum ForexError {
    /// Required configuration such as the access key is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One or more requested pairs are outside the supported set.
    #[error("Unsupported currency pairs: {}", .0.join(", "))]
    UnsupportedPair(Vec<String>),

    /// The provider body could not be parsed as JSON.
    #[error("Invalid JSON response from API: {0}")]
    InvalidResponse(String),

    /// The provider answered with `success: false`.
    #[error("API returned error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ForexError> = std::result::Result<T, E>;
