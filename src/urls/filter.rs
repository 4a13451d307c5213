//! Literal-or-regex filters used by option records.

use crate::error::{Result, UrlsiftError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A pattern given either as a literal string or as a compiled regex.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "FilterRepr", into = "FilterRepr")]
pub enum Filter {
    Literal(String),
    Regex(Regex),
}

/// Wire form: a bare JSON string is a literal, `{"regex": ..}` is a regex.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FilterRepr {
    Literal(String),
    Regex {
        regex: String,
        #[serde(default, rename = "caseInsensitive")]
        case_insensitive: bool,
    },
}

impl Filter {
    pub fn literal(s: impl Into<String>) -> Self {
        Filter::Literal(s.into())
    }

    /// Compile `pattern` into a regex filter.
    pub fn regex(pattern: &str) -> Result<Self> {
        compile(pattern, false).map(Filter::Regex)
    }

    /// Name test: literals compare by equality, regexes by search.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Filter::Literal(s) => s == name,
            Filter::Regex(re) => re.is_match(name),
        }
    }

    /// View this filter as a regex, compiling literals as patterns.
    pub fn to_regex(&self) -> Result<Cow<'_, Regex>> {
        match self {
            Filter::Literal(s) => compile(s, false).map(Cow::Owned),
            Filter::Regex(re) => Ok(Cow::Borrowed(re)),
        }
    }
}

fn compile(pattern: &str, case_insensitive: bool) -> Result<Regex> {
    // The flag goes into the source so it survives serialization.
    let source: Cow<'_, str> = if case_insensitive {
        Cow::Owned(format!("(?i){pattern}"))
    } else {
        Cow::Borrowed(pattern)
    };
    Regex::new(&source)
        .map_err(|e| UrlsiftError::Config(format!("invalid pattern '{pattern}': {e}")))
}

impl TryFrom<FilterRepr> for Filter {
    type Error = UrlsiftError;

    fn try_from(repr: FilterRepr) -> Result<Self> {
        match repr {
            FilterRepr::Literal(s) => Ok(Filter::Literal(s)),
            FilterRepr::Regex {
                regex,
                case_insensitive,
            } => compile(&regex, case_insensitive).map(Filter::Regex),
        }
    }
}

impl From<Filter> for FilterRepr {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Literal(s) => FilterRepr::Literal(s),
            // Inline flags such as `(?i)` are kept in the source text.
            Filter::Regex(re) => FilterRepr::Regex {
                regex: re.as_str().to_string(),
                case_insensitive: false,
            },
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Literal(s) => write!(f, "Literal({s:?})"),
            Filter::Regex(re) => write!(f, "Regex(/{}/)", re.as_str()),
        }
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Filter::Literal(a), Filter::Literal(b)) => a == b,
            (Filter::Regex(a), Filter::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_by_equality() {
        let f = Filter::literal("ref");
        assert!(f.matches("ref"));
        assert!(!f.matches("referrer"));
    }

    #[test]
    fn regex_matches_by_search() {
        let f = Filter::regex("^utm_").unwrap();
        assert!(f.matches("utm_source"));
        assert!(!f.matches("x_utm_source"));
    }

    #[test]
    fn literal_compiles_to_regex_for_exclusion() {
        let f = Filter::literal(r"a\.com");
        assert!(f.to_regex().unwrap().is_match("http://a.com"));
        assert!(matches!(
            Filter::literal("(unclosed").to_regex(),
            Err(UrlsiftError::Config(_))
        ));
    }

    #[test]
    fn deserializes_both_forms() {
        let filters: Vec<Filter> =
            serde_json::from_str(r#"["fbclid", {"regex": "^UTM_", "caseInsensitive": true}]"#)
                .unwrap();
        assert_eq!(filters[0], Filter::literal("fbclid"));
        assert!(filters[1].matches("utm_medium"));
    }

    #[test]
    fn invalid_regex_fails_deserialization() {
        let res: std::result::Result<Filter, _> = serde_json::from_str(r#"{"regex": "("}"#);
        assert!(res.is_err());
    }
}
