//! Common test utilities and helpers.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use urlsift::{extract_urls, ScanOptions};

/// Get the full path to a sample file
pub fn sample_file_path<P: AsRef<Path>>(relative_path: P) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(relative_path)
}

/// Read a text sample, or `None` when the samples directory is absent.
pub fn read_sample<P: AsRef<Path>>(relative_path: P) -> Option<String> {
    std::fs::read_to_string(sample_file_path(relative_path)).ok()
}

/// Extract with default options and return the sorted members.
pub fn extract_default(text: &str) -> Vec<String> {
    extract_urls(text, &ScanOptions::default())
        .expect("default options are valid")
        .into_iter()
        .collect()
}

/// Parse a scan options document, panicking on invalid input.
pub fn scan_options(json: &str) -> ScanOptions {
    ScanOptions::from_json_str(json).expect("valid scan options")
}

pub fn as_vec(set: BTreeSet<String>) -> Vec<String> {
    set.into_iter().collect()
}
