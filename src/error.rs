//! Error types for startup and catalog loading.
//!
//! Request-time failures never surface as [`ConsoleError`]: remote calls fold
//! transport problems into [`crate::remote::ApiOutcome`] and handlers map
//! everything else onto JSON responses.

use thiserror::Error;

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Configuration could not be assembled.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Command line arguments were rejected.
    #[error("Invalid arguments: {0}")]
    Cli(String),

    /// Catalog file exists but could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    CatalogIo {
        /// Catalog path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a JSON array of actor descriptors.
    #[error("Failed to parse catalog {path}: {source}")]
    CatalogParse {
        /// Catalog path.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Remote base URL is not a valid URL.
    #[error("Invalid remote URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Caller supplied input that is not valid JSON.
    #[error("Invalid JSON input: {0}")]
    InvalidInput(#[from] serde_json::Error),
}

/// Result type alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
