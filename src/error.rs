//! Error types for the fetcher library

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, FetcherError>;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum FetcherError {
    /// Missing or unreadable input, unwritable output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP, envelope or payload failure from the explorer API
    #[error("Upstream request error: {0}")]
    Upstream(String),

    /// A virtual path in a multi-file bundle has no `.sol` segment
    #[error("Cannot extract source file name from path: {0}")]
    SourceNameExtraction(String),

    /// Compiler version string without a recognizable version token
    #[error("Cannot extract compiler version from: {0:?}")]
    VersionExtraction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Request URLs carry the API key
impl From<reqwest::Error> for FetcherError {
    fn from(e: reqwest::Error) -> Self {
        FetcherError::Upstream(e.without_url().to_string())
    }
}

impl From<config::ConfigError> for FetcherError {
    fn from(e: config::ConfigError) -> Self {
        FetcherError::Config(e.to_string())
    }
}
