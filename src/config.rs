//! Top-level configuration.
//!
//! Groups the scan options with the classification policies so a host can
//! keep everything in one JSON document:
//!
//! ```json
//! {
//!   "scan": {"exclude": ["internal\\.example"], "stripWWW": true},
//!   "category": {"threshold": 0.05},
//!   "tone": {"tone_id": "anger", "threshold": 0.6}
//! }
//! ```

use crate::classify::{CategoryPolicy, TonePolicy};
use crate::error::Result;
use crate::urls::ScanOptions;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Master configuration for urlsift hosts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UrlsiftConfig {
    /// URL extraction and normalization options.
    pub scan: ScanOptions,
    /// Category matching policy.
    pub category: CategoryPolicy,
    /// Tone matching policy.
    pub tone: TonePolicy,
}

impl UrlsiftConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "loaded urlsift configuration");
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UrlsiftError;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = UrlsiftConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg.category.threshold, 0.05);
        assert_eq!(cfg.tone.tone_id, "anger");
        assert_eq!(cfg.tone.threshold, 0.6);
        assert!(cfg.scan.exclude.is_empty());
    }

    #[test]
    fn nested_sections_override() {
        let cfg = UrlsiftConfig::from_json_str(
            r#"{"scan": {"stripWWW": false, "extractFromQueryString": true},
                "tone": {"threshold": 0.75}}"#,
        )
        .unwrap();
        assert!(!cfg.scan.normalize.strip_www);
        assert!(cfg.scan.extract_from_query_string);
        assert_eq!(cfg.tone.threshold, 0.75);
        assert_eq!(cfg.tone.tone_id, "anger");
    }

    #[test]
    fn bad_exclude_surfaces_as_error() {
        let err = UrlsiftConfig::from_json_str(r#"{"scan": {"exclude": 3}}"#).unwrap_err();
        assert!(matches!(err, UrlsiftError::Serialization(_)));
        assert!(err.to_string().contains("`exclude`"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = UrlsiftConfig::load("/nonexistent/urlsift.json").unwrap_err();
        assert!(matches!(err, UrlsiftError::Io(_)));
    }
}
