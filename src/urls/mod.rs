//! URL extraction and canonicalization.
//!
//! `extract_urls` finds URL-shaped substrings in natural-language text with a
//! layered lexical grammar and returns their normalized forms as a set.
//! `normalize_url` is the canonicalizer it uses, also usable on its own.
//! Both are pure: the only shared state is the lazily compiled grammar.

mod config;
mod extract;
mod filter;
pub mod grammar;
pub mod ip;
mod normalize;

pub use config::{
    DirectoryIndex, NormalizeOptions, RawNormalizeOptions, ScanOptions, DEFAULT_DIRECTORY_INDEX,
};
pub use extract::{extract_urls, extract_urls_batch};
pub use filter::Filter;
pub use grammar::{find_urls, url_pattern, url_regex, GrammarOptions};
pub use normalize::normalize_url;
