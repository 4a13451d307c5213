//! URL canonicalization.
//!
//! `normalize_url` maps equivalent spellings of a URL onto one string so the
//! result can be used as a dedup or cache key. Every step is gated by a
//! field of `NormalizeOptions`; see that type for the knobs.

use crate::error::{Result, UrlsiftError};
use crate::urls::config::NormalizeOptions;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::borrow::Cow;
use tracing::trace;
use url::{Host, Url};

static RE_HAS_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+://").expect("valid scheme regex"));
static RE_RELATIVE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.*/").expect("valid relative path regex"));
static RE_DUPLICATE_SLASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/{2,}").expect("valid slash run regex"));
// Hostname labels are 2-63 characters, the extension 2-5.
static RE_WWW_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^www\.([a-z\-\d]{2,63})\.([a-z.]{2,5})$").expect("valid www host regex")
});
/// Escapes of `;/?:@&=+$,#`, which path decoding leaves alone.
static RE_RESERVED_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)%(?:3B|2F|3F|3A|40|26|3D|2B|24|2C|23)").expect("valid reserved escape regex")
});

/// Prepend `scheme` to input that does not already carry `scheme://`.
/// Protocol-relative input (`//host`) only gains the scheme name.
pub(crate) fn with_default_protocol<'a>(s: &'a str, scheme: &str) -> Cow<'a, str> {
    if s.starts_with("//") {
        Cow::Owned(format!("{scheme}:{s}"))
    } else if RE_HAS_SCHEME.is_match(s) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("{scheme}://{s}"))
    }
}

/// Percent-decode a path the way `decodeURI` does: escapes of reserved
/// characters survive, everything else is decoded. Returns `None` when the
/// decoded bytes are not UTF-8.
fn decode_path(path: &str) -> Option<String> {
    let mut out = String::with_capacity(path.len());
    let mut last = 0;
    for m in RE_RESERVED_ESCAPE.find_iter(path) {
        out.push_str(&percent_decode_str(&path[last..m.start()]).decode_utf8().ok()?);
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&percent_decode_str(&path[last..]).decode_utf8().ok()?);
    Some(out)
}

fn set_scheme(url: &mut Url, scheme: &str, original: &str) -> Result<()> {
    url.set_scheme(scheme)
        .map_err(|()| UrlsiftError::MalformedUrl {
            url: original.to_string(),
            reason: format!("cannot switch scheme to {scheme}"),
        })
}

fn collapse_slashes(url: &mut Url) {
    let collapsed = RE_DUPLICATE_SLASHES.replace_all(url.path(), "/").into_owned();
    if collapsed != url.path() {
        url.set_path(&collapsed);
    }
}

fn decode_path_in_place(url: &mut Url) {
    let path = url.path().to_string();
    match decode_path(&path) {
        Some(decoded) if decoded != path => url.set_path(&decoded),
        Some(_) => {}
        None => trace!(path = %path, "path is not UTF-8 once decoded; left escaped"),
    }
}

fn remove_directory_index(url: &mut Url, opts: &NormalizeOptions) {
    let filters = opts.remove_directory_index.patterns();
    if filters.is_empty() {
        return;
    }
    let path = url.path().to_string();
    let mut components: Vec<&str> = path.split('/').collect();
    let is_index = components
        .last()
        .map(|last| filters.iter().any(|f| f.matches(last)))
        .unwrap_or(false);
    if is_index {
        components.pop();
        let dir = components[1..].join("/");
        if dir.is_empty() {
            url.set_path("/");
        } else {
            url.set_path(&format!("/{dir}/"));
        }
    }
}

fn normalize_host(url: &mut Url, original: &str, opts: &NormalizeOptions) -> Result<()> {
    let host = match url.host() {
        Some(Host::Domain(h)) => h.to_string(),
        _ => return Ok(()),
    };
    let mut new_host = host.strip_suffix('.').unwrap_or(&host);
    if opts.strip_www && RE_WWW_HOST.is_match(new_host) {
        new_host = &new_host[4..];
    }
    if new_host != host {
        url.set_host(Some(new_host))
            .map_err(|e| UrlsiftError::malformed(original, e))?;
    }
    Ok(())
}

fn rewrite_query(url: &mut Url, opts: &NormalizeOptions) {
    if url.query().is_none() {
        return;
    }
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let before = pairs.len();
    if let Some(filters) = &opts.remove_query_parameters {
        pairs.retain(|(key, _)| !filters.iter().any(|f| f.matches(key)));
    }
    let removed = pairs.len() != before;
    if opts.sort_query_parameters {
        // Stable: equal keys keep their relative order.
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
    }
    if !(removed || opts.sort_query_parameters) {
        return;
    }
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
}

/// Normalize a URL string into its canonical form.
///
/// Scheme-less input gets `opts.default_protocol`; relative paths such as
/// `./page` cannot be parsed without a base and yield
/// `UrlsiftError::MalformedUrl`. Conflicting options are rejected before
/// the input is looked at.
pub fn normalize_url(input: &str, opts: &NormalizeOptions) -> Result<String> {
    opts.validate()?;

    let trimmed = input.trim();
    let has_relative_protocol = trimmed.starts_with("//");
    let is_relative_path = !has_relative_protocol && RE_RELATIVE_PATH.is_match(trimmed);

    let prepared = if is_relative_path {
        Cow::Borrowed(trimmed)
    } else {
        with_default_protocol(trimmed, opts.default_scheme())
    };

    let mut url = Url::parse(&prepared).map_err(|e| UrlsiftError::malformed(trimmed, e))?;

    if opts.force_http && url.scheme() == "https" {
        set_scheme(&mut url, "http", trimmed)?;
    }
    if opts.force_https && url.scheme() == "http" {
        set_scheme(&mut url, "https", trimmed)?;
    }

    if opts.strip_hash {
        url.set_fragment(None);
    }

    if !url.cannot_be_a_base() {
        collapse_slashes(&mut url);
        decode_path_in_place(&mut url);
        // Decoding `%5C` yields a backslash, which the parser reads as `/`.
        collapse_slashes(&mut url);
        remove_directory_index(&mut url, opts);
    }

    normalize_host(&mut url, trimmed, opts)?;
    rewrite_query(&mut url, opts);

    let mut out = String::from(url.as_str());

    if (opts.remove_trailing_slash || url.path() == "/") && out.ends_with('/') {
        out.pop();
    }

    if has_relative_protocol && !opts.normalize_protocol {
        if let Some(rest) = out.strip_prefix("http://") {
            out = format!("//{rest}");
        }
    }

    trace!(input = %input, output = %out, "normalized URL");
    Ok(out)
}
