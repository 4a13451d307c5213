//! URL extraction and canonicalization for text classification glue.
//!
//! `urls` finds URL-like substrings in free text and normalizes them;
//! `classify` reduces remote classification responses to a yes/no answer
//! for a piece of text and the URLs it mentions.

pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod urls;

#[cfg(feature = "python-ext")]
pub mod python_bindings;

pub use config::UrlsiftConfig;
pub use error::{Result, UrlsiftError};
pub use urls::{extract_urls, normalize_url, NormalizeOptions, ScanOptions};

#[cfg(feature = "python-ext")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python-ext")]
#[pymodule]
fn urlsift(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python_bindings::register_python_bindings(m.py(), m)
}
