//! Error types for urlsift.
//!
//! Every failure is scoped to the call that raised it: configuration
//! problems surface before any matching starts, malformed URLs surface to
//! the caller of `normalize_url`.

use thiserror::Error;

/// Main error type for urlsift operations.
#[derive(Debug, Error)]
pub enum UrlsiftError {
    /// Invalid option combination or option value
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL could not be parsed into its structured form
    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failure reported by a remote classifier implementation
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Option documents that are not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O errors while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UrlsiftError {
    pub(crate) fn malformed(url: &str, err: url::ParseError) -> Self {
        UrlsiftError::MalformedUrl {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for UrlsiftError {
    fn from(err: serde_json::Error) -> Self {
        UrlsiftError::Serialization(err.to_string())
    }
}

/// Result type alias for urlsift operations
pub type Result<T> = std::result::Result<T, UrlsiftError>;

/// Convert urlsift errors to PyO3 exceptions
#[cfg(feature = "python-ext")]
impl From<UrlsiftError> for pyo3::PyErr {
    fn from(err: UrlsiftError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};

        match err {
            UrlsiftError::Io(e) => PyIOError::new_err(e.to_string()),
            UrlsiftError::Classifier(msg) => PyRuntimeError::new_err(msg),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}
