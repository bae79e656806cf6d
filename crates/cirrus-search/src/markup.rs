//! Plain-text helpers for stored page text.

use std::sync::LazyLock;

use regex::Regex;

/// An HTML or XML tag.
static TAG: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"<[^>]*>"));

/// Compiles a hardcoded pattern, falling back to one that never matches.
pub fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(fallback) => fallback,
            Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
        },
    }
}

/// Removes tags and collapses whitespace.
pub fn strip_markup(text: &str) -> String {
    TAG.replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
