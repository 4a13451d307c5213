//! Python bindings for URL extraction and normalization.

use crate::urls::{NormalizeOptions, ScanOptions};
use pyo3::prelude::*;

fn scan_options(options_json: Option<&str>) -> PyResult<ScanOptions> {
    match options_json {
        Some(s) => Ok(ScanOptions::from_json_str(s)?),
        None => Ok(ScanOptions::default()),
    }
}

fn normalize_options(options_json: Option<&str>) -> PyResult<NormalizeOptions> {
    match options_json {
        Some(s) => Ok(serde_json::from_str(s).map_err(crate::error::UrlsiftError::from)?),
        None => Ok(NormalizeOptions::default()),
    }
}

/// Extract the normalized URLs mentioned in `text`, sorted.
#[pyfunction]
#[pyo3(name = "extract_urls")]
#[pyo3(signature = (text, options_json=None))]
fn extract_urls_py(text: &str, options_json: Option<&str>) -> PyResult<Vec<String>> {
    let opts = scan_options(options_json)?;
    let found = crate::urls::extract_urls(text, &opts)?;
    Ok(found.into_iter().collect())
}

/// Extract URLs from many texts at once.
#[pyfunction]
#[pyo3(name = "extract_urls_batch")]
#[pyo3(signature = (texts, options_json=None))]
fn extract_urls_batch_py(texts: Vec<String>, options_json: Option<&str>) -> PyResult<Vec<Vec<String>>> {
    let opts = scan_options(options_json)?;
    let found = crate::urls::extract_urls_batch(&texts, &opts)?;
    Ok(found
        .into_iter()
        .map(|set| set.into_iter().collect())
        .collect())
}

/// Normalize a single URL.
#[pyfunction]
#[pyo3(name = "normalize_url")]
#[pyo3(signature = (url, options_json=None))]
fn normalize_url_py(url: &str, options_json: Option<&str>) -> PyResult<String> {
    let opts = normalize_options(options_json)?;
    Ok(crate::urls::normalize_url(url, &opts)?)
}

/// Return the URL-matching regular expression source.
#[pyfunction]
#[pyo3(name = "url_pattern")]
#[pyo3(signature = (exact=false))]
fn url_pattern_py(exact: bool) -> PyResult<String> {
    let opts = crate::urls::GrammarOptions {
        exact,
        ..Default::default()
    };
    Ok(crate::urls::url_pattern(&opts)?)
}

/// Register URL-related Python bindings.
pub fn register_urls_bindings(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    let urls_mod = pyo3::types::PyModule::new(py, "urls")?;

    urls_mod.add_function(wrap_pyfunction!(extract_urls_py, &urls_mod)?)?;
    urls_mod.add_function(wrap_pyfunction!(extract_urls_batch_py, &urls_mod)?)?;
    urls_mod.add_function(wrap_pyfunction!(normalize_url_py, &urls_mod)?)?;
    urls_mod.add_function(wrap_pyfunction!(url_pattern_py, &urls_mod)?)?;

    m.add_submodule(&urls_mod)?;
    Ok(())
}
