//! Option records for URL normalization and extraction.
//!
//! Options deserialize from the camelCase JSON documents hosts already send
//! (`{"stripWWW": false, "exclude": ["a\\.com"]}`). Legacy option names are
//! folded into their current names in a single pass on the way in.

use crate::error::{Result, UrlsiftError};
use crate::urls::filter::Filter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

static RE_UTM_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^utm_\w+").expect("valid utm regex"));
static RE_DIRECTORY_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^index\.[a-z]+$").expect("valid directory index regex"));

/// Filename filter applied by `DirectoryIndex::Default`.
pub static DEFAULT_DIRECTORY_INDEX: Lazy<Vec<Filter>> =
    Lazy::new(|| vec![Filter::Regex(RE_DIRECTORY_INDEX.clone())]);

/// Which trailing path segments count as a directory index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "DirectoryIndexRepr", into = "DirectoryIndexRepr")]
pub enum DirectoryIndex {
    #[default]
    Disabled,
    /// `index.<ext>` files
    Default,
    Patterns(Vec<Filter>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DirectoryIndexRepr {
    Flag(bool),
    Patterns(Vec<Filter>),
}

impl DirectoryIndex {
    pub fn patterns(&self) -> &[Filter] {
        match self {
            DirectoryIndex::Disabled => &[],
            DirectoryIndex::Default => DEFAULT_DIRECTORY_INDEX.as_slice(),
            DirectoryIndex::Patterns(p) => p.as_slice(),
        }
    }
}

impl TryFrom<DirectoryIndexRepr> for DirectoryIndex {
    type Error = UrlsiftError;

    fn try_from(repr: DirectoryIndexRepr) -> Result<Self> {
        Ok(match repr {
            DirectoryIndexRepr::Flag(true) => DirectoryIndex::Default,
            DirectoryIndexRepr::Flag(false) => DirectoryIndex::Disabled,
            DirectoryIndexRepr::Patterns(p) => DirectoryIndex::Patterns(p),
        })
    }
}

impl From<DirectoryIndex> for DirectoryIndexRepr {
    fn from(index: DirectoryIndex) -> Self {
        match index {
            DirectoryIndex::Disabled => DirectoryIndexRepr::Flag(false),
            DirectoryIndex::Default => DirectoryIndexRepr::Flag(true),
            DirectoryIndex::Patterns(p) => DirectoryIndexRepr::Patterns(p),
        }
    }
}

/// Configuration for `normalize_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawNormalizeOptions")]
pub struct NormalizeOptions {
    /// Protocol prepended to scheme-less input, with or without the colon.
    pub default_protocol: String,
    /// When off, protocol-relative input (`//host`) is written back as `//`.
    pub normalize_protocol: bool,
    pub force_http: bool,
    pub force_https: bool,
    pub strip_hash: bool,
    #[serde(rename = "stripWWW")]
    pub strip_www: bool,
    /// Query keys to drop. `None` keeps every key.
    pub remove_query_parameters: Option<Vec<Filter>>,
    pub remove_trailing_slash: bool,
    pub remove_directory_index: DirectoryIndex,
    pub sort_query_parameters: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            default_protocol: "http:".to_string(),
            normalize_protocol: true,
            force_http: false,
            force_https: false,
            strip_hash: true,
            strip_www: true,
            remove_query_parameters: Some(vec![Filter::Regex(RE_UTM_PARAM.clone())]),
            remove_trailing_slash: true,
            remove_directory_index: DirectoryIndex::Disabled,
            sort_query_parameters: true,
        }
    }
}

impl NormalizeOptions {
    /// Reject contradictory option combinations.
    pub fn validate(&self) -> Result<()> {
        if self.force_http && self.force_https {
            return Err(UrlsiftError::Config(
                "The `forceHttp` and `forceHttps` options cannot be used together".to_string(),
            ));
        }
        Ok(())
    }

    /// Scheme name of `default_protocol` without the trailing colon.
    pub fn default_scheme(&self) -> &str {
        self.default_protocol.trim_end_matches(':')
    }
}

/// `removeQueryParameters` accepts a pattern list; a boolean or null
/// disables it.
#[derive(Deserialize)]
#[serde(untagged)]
enum QueryFilterRepr {
    Flag(#[allow(dead_code)] bool),
    Patterns(Vec<Filter>),
    Null,
}

/// Loosely-typed option document as hosts send it, legacy names included.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNormalizeOptions {
    pub default_protocol: Option<String>,
    pub normalize_protocol: Option<bool>,
    pub force_http: Option<bool>,
    pub force_https: Option<bool>,
    pub strip_hash: Option<bool>,
    #[serde(rename = "stripWWW")]
    pub strip_www: Option<bool>,
    #[serde(deserialize_with = "query_filters")]
    pub remove_query_parameters: Option<Option<Vec<Filter>>>,
    pub remove_trailing_slash: Option<bool>,
    pub remove_directory_index: Option<DirectoryIndex>,
    pub sort_query_parameters: Option<bool>,
    /// Legacy name of `forceHttp`
    pub normalize_https: Option<bool>,
    /// Legacy name of `forceHttps`
    pub normalize_http: Option<bool>,
    /// Legacy name of `stripHash`
    pub strip_fragment: Option<bool>,
}

fn query_filters<'de, D>(d: D) -> std::result::Result<Option<Option<Vec<Filter>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(match QueryFilterRepr::deserialize(d)? {
        QueryFilterRepr::Flag(_) | QueryFilterRepr::Null => None,
        QueryFilterRepr::Patterns(p) => Some(p),
    }))
}

impl RawNormalizeOptions {
    /// Merge over the defaults, folding legacy names into current ones.
    /// A legacy name wins over its current name when both are given.
    pub fn resolve(self) -> Result<NormalizeOptions> {
        let d = NormalizeOptions::default();
        let opts = NormalizeOptions {
            default_protocol: self.default_protocol.unwrap_or(d.default_protocol),
            normalize_protocol: self.normalize_protocol.unwrap_or(d.normalize_protocol),
            force_http: self
                .normalize_https
                .or(self.force_http)
                .unwrap_or(d.force_http),
            force_https: self
                .normalize_http
                .or(self.force_https)
                .unwrap_or(d.force_https),
            strip_hash: self
                .strip_fragment
                .or(self.strip_hash)
                .unwrap_or(d.strip_hash),
            strip_www: self.strip_www.unwrap_or(d.strip_www),
            remove_query_parameters: self
                .remove_query_parameters
                .unwrap_or(d.remove_query_parameters),
            remove_trailing_slash: self.remove_trailing_slash.unwrap_or(d.remove_trailing_slash),
            remove_directory_index: self
                .remove_directory_index
                .unwrap_or(d.remove_directory_index),
            sort_query_parameters: self.sort_query_parameters.unwrap_or(d.sort_query_parameters),
        };
        opts.validate()?;
        Ok(opts)
    }
}

impl TryFrom<RawNormalizeOptions> for NormalizeOptions {
    type Error = UrlsiftError;

    fn try_from(raw: RawNormalizeOptions) -> Result<Self> {
        raw.resolve()
    }
}

/// Configuration for `extract_urls`.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Members matching any of these are dropped from the result. Literal
    /// entries are compiled as regexes.
    pub exclude: Vec<Filter>,
    /// Also harvest URLs found in query-string values of each match.
    pub extract_from_query_string: bool,
    /// Options applied to every extracted URL.
    pub normalize: NormalizeOptions,
}

impl ScanOptions {
    /// Build scan options from a flat JSON document carrying both scan and
    /// normalization keys.
    pub fn from_json(value: &Value) -> Result<Self> {
        if !(value.is_object() || value.is_null()) {
            return Err(UrlsiftError::Config(
                "scan options must be a JSON object".to_string(),
            ));
        }

        let exclude = match value.get("exclude") {
            None | Some(Value::Null) => Vec::new(),
            Some(v @ Value::Array(_)) => Vec::<Filter>::deserialize(v)?,
            Some(_) => {
                return Err(UrlsiftError::Config(
                    "The `exclude` option must be an array".to_string(),
                ))
            }
        };

        let extract_from_query_string = match value.get("extractFromQueryString") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(UrlsiftError::Config(
                    "The `extractFromQueryString` option must be a boolean".to_string(),
                ))
            }
        };

        let normalize = if value.is_null() {
            NormalizeOptions::default()
        } else {
            NormalizeOptions::deserialize(value)?
        };

        Ok(Self {
            exclude,
            extract_from_query_string,
            normalize,
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }
}

impl<'de> Deserialize<'de> for ScanOptions {
    fn deserialize<D>(d: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(d)?;
        ScanOptions::from_json(&value).map_err(serde::de::Error::custom)
    }
}
