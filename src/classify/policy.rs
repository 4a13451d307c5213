//! Threshold policies that reduce a classification response to a boolean.

use crate::classify::response::{CategoryResponse, ToneResponse};
use serde::{Deserialize, Serialize};

/// Matches when a requested category scores above `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPolicy {
    /// Scores must be strictly greater than this
    pub threshold: f64,
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self { threshold: 0.05 }
    }
}

impl CategoryPolicy {
    /// True when any returned category whose label contains one of
    /// `requested` scores above the threshold. An empty request never matches.
    pub fn matches<S: AsRef<str>>(&self, response: &CategoryResponse, requested: &[S]) -> bool {
        response
            .categories
            .iter()
            .filter(|c| requested.iter().any(|r| c.label.contains(r.as_ref())))
            .any(|c| c.score > self.threshold)
    }
}

/// Matches when the named document tone scores above `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TonePolicy {
    pub tone_id: String,
    pub threshold: f64,
}

impl Default for TonePolicy {
    fn default() -> Self {
        Self {
            tone_id: "anger".to_string(),
            threshold: 0.6,
        }
    }
}

impl TonePolicy {
    /// Only the first tone entry with a matching id is consulted.
    pub fn matches(&self, response: &ToneResponse) -> bool {
        response
            .document_tone
            .tones
            .iter()
            .find(|t| t.tone_id == self.tone_id)
            .map(|t| t.score > self.threshold)
            .unwrap_or(false)
    }
}
