//! URL extraction from free text.

use crate::error::Result;
use crate::urls::config::{NormalizeOptions, ScanOptions};
use crate::urls::grammar::{find_urls, RE_URL, RE_URL_EXACT};
use crate::urls::normalize::{normalize_url, with_default_protocol};
use rayon::prelude::*;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::{debug, debug_span};
use url::Url;

/// Batches at least this large are scanned on the rayon pool.
const PAR_THRESHOLD: usize = 64;

fn insert_normalized(found: &mut BTreeSet<String>, candidate: &str, opts: &NormalizeOptions) {
    match normalize_url(candidate, opts) {
        Ok(url) => {
            found.insert(url);
        }
        Err(e) => debug!(candidate = %candidate, error = %e, "skipping URL candidate"),
    }
}

/// Query-string values of `raw` that are URLs in their own right.
fn urls_in_query(raw: &str, default_scheme: &str) -> Vec<String> {
    let prepared = with_default_protocol(raw.trim(), default_scheme);
    let url = match Url::parse(&prepared) {
        Ok(u) => u,
        Err(e) => {
            debug!(candidate = %raw, error = %e, "cannot read query string");
            return Vec::new();
        }
    };
    url.query_pairs()
        .filter(|(_, value)| RE_URL_EXACT.is_match(value))
        .map(|(_, value)| value.into_owned())
        .collect()
}

/// Extract the distinct normalized URLs contained in `text`.
///
/// Candidates are trimmed, stripped of trailing dots and normalized with
/// `opts.normalize`. Candidates the normalizer rejects are skipped. Members
/// matching any `opts.exclude` pattern are removed from the result.
pub fn extract_urls(text: &str, opts: &ScanOptions) -> Result<BTreeSet<String>> {
    opts.normalize.validate()?;
    let excludes: Vec<Cow<'_, Regex>> = opts
        .exclude
        .iter()
        .map(|f| f.to_regex())
        .collect::<Result<_>>()?;

    let span = debug_span!("extract_urls", text_len = text.len());
    let _guard = span.enter();

    let mut found = BTreeSet::new();
    for m in find_urls(&RE_URL, text) {
        let raw = m.as_str();
        insert_normalized(&mut found, raw.trim().trim_end_matches('.'), &opts.normalize);

        if opts.extract_from_query_string {
            for nested in urls_in_query(raw, opts.normalize.default_scheme()) {
                insert_normalized(&mut found, nested.trim().trim_end_matches('.'), &opts.normalize);
            }
        }
    }

    if !excludes.is_empty() {
        let excluded: Vec<String> = found
            .iter()
            .filter(|url| excludes.iter().any(|re| re.is_match(url)))
            .cloned()
            .collect();
        for url in &excluded {
            found.remove(url);
        }
    }

    debug!(members = found.len(), "extracted URLs");
    Ok(found)
}

/// Run `extract_urls` over many texts, preserving input order.
pub fn extract_urls_batch<S>(texts: &[S], opts: &ScanOptions) -> Result<Vec<BTreeSet<String>>>
where
    S: AsRef<str> + Sync,
{
    if texts.len() >= PAR_THRESHOLD {
        texts
            .par_iter()
            .map(|t| extract_urls(t.as_ref(), opts))
            .collect()
    } else {
        texts.iter().map(|t| extract_urls(t.as_ref(), opts)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urls::filter::Filter;

    fn extract(text: &str) -> Vec<String> {
        extract_urls(text, &ScanOptions::default())
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn empty_text_yields_empty_set() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn normalizes_and_dedups() {
        let text = "Go to http://www.example.com/ or example at https://example.com/a. \
                    Also http://example.com and www.example.com.";
        assert_eq!(
            extract(text),
            vec!["http://example.com", "https://example.com/a"]
        );
    }

    #[test]
    fn exclusion_removes_matching_members() {
        let opts = ScanOptions {
            exclude: vec![Filter::literal(r"a\.com")],
            ..ScanOptions::default()
        };
        let found = extract_urls("visit http://a.com and http://b.com", &opts).unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["http://b.com"]);
    }

    #[test]
    fn exclusion_with_several_patterns() {
        let opts = ScanOptions {
            exclude: vec![
                Filter::regex("^https://").unwrap(),
                Filter::literal("c\\.org"),
            ],
            ..ScanOptions::default()
        };
        let found =
            extract_urls("https://a.com http://b.net http://c.org https://b.net", &opts).unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["http://b.net"]);
    }

    #[test]
    fn invalid_exclude_pattern_fails_before_scanning() {
        let opts = ScanOptions {
            exclude: vec![Filter::literal("(")],
            ..ScanOptions::default()
        };
        assert!(extract_urls("http://a.com", &opts).is_err());
    }

    #[test]
    fn query_string_urls_extracted_when_enabled() {
        let text = "http://redirect.example/?to=http%3A%2F%2Ftarget.org%2Fpage&bad=http%3A%2F%2F";
        assert_eq!(extract(text), vec!["http://redirect.example/?bad=http%3A%2F%2F&to=http%3A%2F%2Ftarget.org%2Fpage"]);

        let opts = ScanOptions {
            extract_from_query_string: true,
            ..ScanOptions::default()
        };
        let found = extract_urls(text, &opts).unwrap();
        assert!(found.contains("http://target.org/page"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn ipv4_literals() {
        assert_eq!(extract("router at http://192.168.0.1/"), vec!["http://192.168.0.1"]);
        assert!(extract("http://999.999.999.999").is_empty());
        assert!(extract("see http://1.2.3.4.5/").is_empty());
    }

    #[test]
    fn hosts_starting_with_a_dotted_quad() {
        assert_eq!(
            extract("dev box at http://192.168.0.1.nip.io/app"),
            vec!["http://192.168.0.1.nip.io/app"]
        );
        assert_eq!(
            extract("http://10.0.0.1.sslip.io:8080/x"),
            vec!["http://10.0.0.1.sslip.io:8080/x"]
        );
    }

    #[test]
    fn conflicting_options_rejected() {
        let mut opts = ScanOptions::default();
        opts.normalize.force_http = true;
        opts.normalize.force_https = true;
        assert!(extract_urls("http://a.com", &opts).is_err());
    }

    #[test]
    fn batch_preserves_order() {
        let texts: Vec<String> = (0..100).map(|i| format!("see http://host{i}.com")).collect();
        let out = extract_urls_batch(&texts, &ScanOptions::default()).unwrap();
        assert_eq!(out.len(), 100);
        assert!(out[42].contains("http://host42.com"));
    }
}
