//! Python bindings for urlsift.
//!
//! Options cross the boundary as JSON strings so the Python side can use the
//! same camelCase documents as every other host.

pub mod urls;

use pyo3::prelude::*;

/// Register all Python bindings with the module.
pub fn register_python_bindings(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(crate::logging::init_logging, m)?)?;
    urls::register_urls_bindings(py, m)?;
    Ok(())
}
