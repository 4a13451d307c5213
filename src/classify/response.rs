//! Response shapes returned by the remote classification services.
//!
//! Only the fields the threshold policies read are modelled; anything else
//! in the service payload is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// One ranked category from a category analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Hierarchical label, e.g. `/technology and computing/software`
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponse {
    #[serde(default)]
    pub categories: Vec<CategoryScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneScore {
    pub tone_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTone {
    #[serde(default)]
    pub tones: Vec<ToneScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneResponse {
    pub document_tone: DocumentTone,
}
