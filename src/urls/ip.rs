//! IPv4 and IPv6 literal grammar.
//!
//! The pattern sources are exported so the URL grammar can splice them into
//! its host alternatives; the compiled matchers below serve standalone use.

use once_cell::sync::Lazy;
use regex::Regex;

/// One IPv4 octet, 0-255.
const V4_OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])";

/// One IPv6 segment, 1-4 hex digits.
const V6_SEG: &str = r"[a-fA-F0-9]{1,4}";

/// Dotted-quad IPv4 literal.
pub static IPV4: Lazy<String> = Lazy::new(|| format!(r"{o}(?:\.{o}){{3}}", o = V4_OCTET));

/// IPv6 literal in any of its compressed forms, with optional dual IPv4 tail
/// and optional zone index.
pub static IPV6: Lazy<String> = Lazy::new(|| {
    let s = V6_SEG;
    let v4 = IPV4.as_str();
    let cases = [
        // 1:2:3:4:5:6:7::  1:2:3:4:5:6:7:8
        format!(r"(?:{s}:){{7}}(?:{s}|:)"),
        // 1:2:3:4:5:6::  1:2:3:4:5:6::8  1:2:3:4:5:6::1.2.3.4
        format!(r"(?:{s}:){{6}}(?:{v4}|:{s}|:)"),
        // 1:2:3:4:5::  1:2:3:4:5::7:8  1:2:3:4:5::7:1.2.3.4
        format!(r"(?:{s}:){{5}}(?::{v4}|(?::{s}){{1,2}}|:)"),
        format!(r"(?:{s}:){{4}}(?:(?::{s}){{0,1}}:{v4}|(?::{s}){{1,3}}|:)"),
        format!(r"(?:{s}:){{3}}(?:(?::{s}){{0,2}}:{v4}|(?::{s}){{1,4}}|:)"),
        format!(r"(?:{s}:){{2}}(?:(?::{s}){{0,3}}:{v4}|(?::{s}){{1,5}}|:)"),
        format!(r"(?:{s}:){{1}}(?:(?::{s}){{0,4}}:{v4}|(?::{s}){{1,6}}|:)"),
        // ::2:3:4:5:6:7:8  ::8  ::1.2.3.4  ::
        format!(r"(?::(?:(?::{s}){{0,5}}:{v4}|(?::{s}){{1,7}}|:))"),
    ];
    format!(r"(?:{})(?:%[0-9a-zA-Z]+)?", cases.join("|"))
});

static RE_IPV4_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", *IPV4)).expect("valid ipv4 regex"));
static RE_IPV6_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", *IPV6)).expect("valid ipv6 regex"));
static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("valid token regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpKind {
    V4,
    V6,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpMatch<'a> {
    pub kind: IpKind,
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

pub fn is_ipv4(s: &str) -> bool {
    RE_IPV4_EXACT.is_match(s)
}

pub fn is_ipv6(s: &str) -> bool {
    RE_IPV6_EXACT.is_match(s)
}

pub fn is_ip(s: &str) -> bool {
    is_ipv4(s) || is_ipv6(s)
}

/// Find IP literals in free text.
///
/// A literal only counts when whitespace or the edge of the text sits on
/// both sides of it, so `1.2.3.4,` or `v1.2.3.4` are not reported.
pub fn find_ips(text: &str) -> Vec<IpMatch<'_>> {
    RE_TOKEN
        .find_iter(text)
        .filter_map(|m| {
            let token = m.as_str();
            let kind = if is_ipv4(token) {
                IpKind::V4
            } else if is_ipv6(token) {
                IpKind::V6
            } else {
                return None;
            };
            Some(IpMatch {
                kind,
                start: m.start(),
                end: m.end(),
                text: token,
            })
        })
        .collect()
}
