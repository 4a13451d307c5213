//! Composed URL grammar.
//!
//! Each lexical layer of a URL is a named sub-pattern; `url_pattern` splices
//! them together into a single expression. Hosts are tried in priority order:
//! `localhost`, a label sequence ending in a top-level domain, an IPv4
//! literal, then a bracketed IPv6 literal. Labels go before IPv4 so hosts
//! such as `10.0.0.1.nip.io` are read whole.

use crate::error::{Result, UrlsiftError};
use crate::urls::ip;
use once_cell::sync::Lazy;
use regex::{Match, Regex, RegexBuilder};

/// Labels may contain any code point from U+00A1 upward, as IDNs do.
const LABEL_CHAR: &str = r"[a-z\x{00a1}-\x{ffff}0-9]";
const TLD_CHAR: &str = r"[a-z\x{00a1}-\x{ffff}]";

const AUTH: &str = r"(?:\S+(?::\S*)?@)?";
const PORT: &str = r"(?::[0-9]{2,5})?";
const PATH: &str = r#"(?:[/?#][^\s"]*)?"#;

/// The wide Unicode classes above compile to large automata.
const GRAMMAR_SIZE_LIMIT: usize = 1 << 26;

/// Compiled strict grammar used by the scanner.
pub static RE_URL: Lazy<Regex> =
    Lazy::new(|| url_regex(&GrammarOptions::default()).expect("valid URL grammar"));

/// Strict grammar anchored to the whole input.
pub static RE_URL_EXACT: Lazy<Regex> = Lazy::new(|| {
    url_regex(&GrammarOptions {
        exact: true,
        ..GrammarOptions::default()
    })
    .expect("valid exact URL grammar")
});

#[derive(Debug, Clone)]
pub struct GrammarOptions {
    /// Require an explicit `scheme://`, `//` or `www.` prefix and accept any
    /// alphabetic TLD of two or more characters.
    pub strict: bool,
    /// Anchor the expression to the whole input.
    pub exact: bool,
    /// TLD table for non-strict mode. Must be non-empty when `strict` is off.
    pub tlds: Vec<String>,
}

impl Default for GrammarOptions {
    fn default() -> Self {
        Self {
            strict: true,
            exact: false,
            tlds: Vec::new(),
        }
    }
}

fn protocol(strict: bool) -> String {
    format!("(?:(?:[a-z]+:)?//){}", if strict { "" } else { "?" })
}

fn host() -> String {
    format!("(?:(?:{c}-*)*{c}+)", c = LABEL_CHAR)
}

fn domain() -> String {
    format!(r"(?:\.(?:{c}-*)*{c}+)*", c = LABEL_CHAR)
}

fn tld(opts: &GrammarOptions) -> Result<String> {
    let body = if opts.strict {
        format!("(?:{}{{2,}})", TLD_CHAR)
    } else {
        if opts.tlds.is_empty() {
            return Err(UrlsiftError::Config(
                "non-strict URL matching requires a TLD table".to_string(),
            ));
        }
        let mut tlds: Vec<&str> = opts.tlds.iter().map(String::as_str).collect();
        // Longest first so `co` never shadows `com`.
        tlds.sort_by(|a, b| b.len().cmp(&a.len()));
        let alts: Vec<String> = tlds.into_iter().map(regex::escape).collect();
        format!("(?:{})", alts.join("|"))
    };
    Ok(format!(r"(?:\.{body})\.?"))
}

/// Build the pattern source for the given options.
pub fn url_pattern(opts: &GrammarOptions) -> Result<String> {
    let ipv4 = format!(r"\b(?P<ipv4>{})\b", *ip::IPV4);
    let ipv6 = format!(r"\[{}\]", *ip::IPV6);
    let pattern = format!(
        r"(?:{protocol}|www\.){AUTH}(?:localhost|{host}{domain}{tld}|{ipv4}|{ipv6}){PORT}{PATH}",
        protocol = protocol(opts.strict),
        host = host(),
        domain = domain(),
        tld = tld(opts)?,
    );
    Ok(if opts.exact {
        format!("^(?:{pattern})$")
    } else {
        pattern
    })
}

/// Compile the URL grammar. Matching is case-insensitive.
pub fn url_regex(opts: &GrammarOptions) -> Result<Regex> {
    let pattern = url_pattern(opts)?;
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .size_limit(GRAMMAR_SIZE_LIMIT)
        .dfa_size_limit(GRAMMAR_SIZE_LIMIT)
        .build()
        .map_err(|e| UrlsiftError::Config(format!("invalid URL grammar: {e}")))
}

fn is_label_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// An IPv4 host must not continue into another label or octet. A single
/// trailing dot is sentence punctuation and is allowed.
fn ipv4_ends_cleanly(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        None => true,
        Some('.') => !chars.next().is_some_and(is_label_char),
        Some(c) => !is_label_char(c),
    }
}

/// Non-overlapping matches of a grammar built by `url_regex`.
///
/// Use this instead of `find_iter`: it drops matches whose IPv4 host is only
/// the prefix of a longer dotted run such as `1.2.3.4.5`.
pub fn find_urls<'t>(re: &Regex, text: &'t str) -> Vec<Match<'t>> {
    re.captures_iter(text)
        .filter(|caps| {
            caps.name("ipv4")
                .map_or(true, |ip| ipv4_ends_cleanly(&text[ip.end()..]))
        })
        .filter_map(|caps| caps.get(0))
        .collect()
}
