//! Glue between extracted URLs and a remote classification service.
//!
//! The service itself lives behind the `Classifier` and `ToneAnalyzer`
//! traits; transports (HTTP clients, credentials) are supplied by the host.
//! This module owns the decision logic: classify the submitted text, fall
//! back to the URLs it mentions, and reduce the responses with a policy.

mod policy;
mod response;

pub use policy::{CategoryPolicy, TonePolicy};
pub use response::{CategoryResponse, CategoryScore, DocumentTone, ToneResponse, ToneScore};

use crate::error::{Result, UrlsiftError};
use crate::urls::{extract_urls, ScanOptions};
use rayon::prelude::*;
use tracing::{debug, info};

/// Remote category analysis.
pub trait Classifier: Send + Sync {
    fn classify_text(&self, text: &str) -> Result<CategoryResponse>;
    fn classify_url(&self, url: &str) -> Result<CategoryResponse>;
}

/// Remote tone analysis.
pub trait ToneAnalyzer: Send + Sync {
    fn analyze_tone(&self, text: &str) -> Result<ToneResponse>;
}

/// Split a comma-separated category parameter, dropping blank entries.
pub fn parse_category_list(param: &str) -> Vec<String> {
    param
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn require_text(status: &str) -> Result<()> {
    if status.trim().is_empty() {
        return Err(UrlsiftError::InvalidInput("status text is empty".to_string()));
    }
    Ok(())
}

/// Decide whether `status` belongs to any of `categories`.
///
/// The text is classified first; when it does not match, each URL extracted
/// from it is classified (concurrently) and any match wins. A failure from
/// the classifier fails the whole call.
pub fn analyze_status<C, S>(
    classifier: &C,
    status: &str,
    categories: &[S],
    policy: &CategoryPolicy,
    scan: &ScanOptions,
) -> Result<bool>
where
    C: Classifier + ?Sized,
    S: AsRef<str> + Sync,
{
    require_text(status)?;
    let urls = extract_urls(status, scan)?;

    let text_response = classifier
        .classify_text(status)
        .map_err(|e| crate::log_error!(e, "classify_text"))?;
    if policy.matches(&text_response, categories) {
        info!(source = "text", "status matched requested categories");
        return Ok(true);
    }

    if urls.is_empty() {
        return Ok(false);
    }
    debug!(urls = urls.len(), "classifying URLs found in status");
    let responses: Vec<CategoryResponse> = urls
        .par_iter()
        .map(|url| classifier.classify_url(url))
        .collect::<Result<_>>()
        .map_err(|e| crate::log_error!(e, "classify_url"))?;
    let matched = responses.iter().any(|r| policy.matches(r, categories));
    info!(source = "urls", matched, "status classification finished");
    Ok(matched)
}

/// Decide whether `status` carries the tone named by `policy`.
pub fn analyze_tone<T>(analyzer: &T, status: &str, policy: &TonePolicy) -> Result<bool>
where
    T: ToneAnalyzer + ?Sized,
{
    require_text(status)?;
    let response = analyzer
        .analyze_tone(status)
        .map_err(|e| crate::log_error!(e, "analyze_tone"))?;
    let matched = policy.matches(&response);
    info!(tone = %policy.tone_id, matched, "tone analysis finished");
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Canned {
        text: CategoryResponse,
        urls: HashMap<String, CategoryResponse>,
    }

    fn resp(label: &str, score: f64) -> CategoryResponse {
        CategoryResponse {
            categories: vec![CategoryScore {
                label: label.to_string(),
                score,
            }],
        }
    }

    impl Classifier for Canned {
        fn classify_text(&self, _text: &str) -> Result<CategoryResponse> {
            Ok(self.text.clone())
        }

        fn classify_url(&self, url: &str) -> Result<CategoryResponse> {
            self.urls
                .get(url)
                .cloned()
                .ok_or_else(|| UrlsiftError::Classifier(format!("no canned response for {url}")))
        }
    }

    #[test]
    fn parse_category_list_splits_and_trims() {
        assert_eq!(parse_category_list("sports, music,,"), vec!["sports", "music"]);
        assert!(parse_category_list("").is_empty());
    }

    #[test]
    fn text_match_short_circuits_url_lookups() {
        // No canned URL responses: a URL lookup would error.
        let c = Canned {
            text: resp("/sports", 0.9),
            urls: HashMap::new(),
        };
        let ok = analyze_status(
            &c,
            "game tonight http://scores.example.com",
            &["sports"],
            &CategoryPolicy::default(),
            &ScanOptions::default(),
        )
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn falls_back_to_urls() {
        let mut urls = HashMap::new();
        urls.insert("http://scores.com".to_string(), resp("/sports/hockey", 0.4));
        let c = Canned {
            text: resp("/news", 0.9),
            urls,
        };
        let ok = analyze_status(
            &c,
            "look at www.scores.com/",
            &["sports"],
            &CategoryPolicy::default(),
            &ScanOptions::default(),
        )
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn classifier_errors_propagate() {
        let c = Canned {
            text: resp("/news", 0.9),
            urls: HashMap::new(),
        };
        let err = analyze_status(
            &c,
            "see http://unknown.example.org",
            &["sports"],
            &CategoryPolicy::default(),
            &ScanOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UrlsiftError::Classifier(_)));
    }

    #[test]
    fn empty_status_is_invalid_input() {
        let c = Canned {
            text: CategoryResponse::default(),
            urls: HashMap::new(),
        };
        let err = analyze_status(
            &c,
            "   ",
            &["sports"],
            &CategoryPolicy::default(),
            &ScanOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UrlsiftError::InvalidInput(_)));
    }

    struct FixedTone(f64);

    impl ToneAnalyzer for FixedTone {
        fn analyze_tone(&self, _text: &str) -> Result<ToneResponse> {
            Ok(ToneResponse {
                document_tone: DocumentTone {
                    tones: vec![ToneScore {
                        tone_id: "anger".to_string(),
                        score: self.0,
                    }],
                },
            })
        }
    }

    #[test]
    fn tone_analysis() {
        let policy = TonePolicy::default();
        assert!(analyze_tone(&FixedTone(0.8), "grr", &policy).unwrap());
        assert!(!analyze_tone(&FixedTone(0.5), "meh", &policy).unwrap());
        assert!(analyze_tone(&FixedTone(0.8), "", &policy).is_err());
    }
}
