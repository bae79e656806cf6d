//! Snippet escaping and highlight resolution.
//!
//! Backend snippets are untrusted page text with highlight markers inserted. They are made
//! safe by HTML-escaping everything and then restoring the markers, which are matched in
//! their escaped form. The escaped markers are computed once per process.

use std::sync::LazyLock;

use tracing::warn;

use crate::{
    backend::RedirectSource,
    request::{HIGHLIGHT_POST, HIGHLIGHT_PRE, SUGGEST_POST, SUGGEST_PRE},
};

/// Escaped snippet highlight markers.
static ESCAPED_HIGHLIGHT: LazyLock<(String, String)> =
    LazyLock::new(|| (escape_html(HIGHLIGHT_PRE), escape_html(HIGHLIGHT_POST)));

/// Escaped suggestion highlight markers.
static ESCAPED_SUGGEST: LazyLock<(String, String)> =
    LazyLock::new(|| (escape_html(SUGGEST_PRE), escape_html(SUGGEST_POST)));

/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes `text` while keeping the given markers intact.
fn escape_keeping(text: &str, escaped: &(String, String), pre: &str, post: &str) -> String {
    escape_html(text)
        .replace(&escaped.0, pre)
        .replace(&escaped.1, post)
}

/// HTML-escapes a highlighted snippet, keeping the highlight markers.
pub fn escape_highlighted_text(snippet: &str) -> String {
    escape_keeping(snippet, &ESCAPED_HIGHLIGHT, HIGHLIGHT_PRE, HIGHLIGHT_POST)
}

/// HTML-escapes a suggestion, keeping the suggestion markers.
pub fn escape_suggestion(snippet: &str) -> String {
    escape_keeping(snippet, &ESCAPED_SUGGEST, SUGGEST_PRE, SUGGEST_POST)
}

/// Removes highlight markers, leaving the plain text.
pub fn strip_highlighting(snippet: &str) -> String {
    snippet.replace(HIGHLIGHT_PRE, "").replace(HIGHLIGHT_POST, "")
}

/// Finds the redirect whose title was highlighted.
///
/// When several redirects share the title, the one in the lowest namespace wins. No match
/// means the backend highlighted a title the page does not have; that is logged and `None`
/// returned.
pub fn find_redirect_title<'a>(
    highlighted: &str,
    redirects: &'a [RedirectSource],
) -> Option<&'a RedirectSource> {
    let title = strip_highlighting(highlighted);
    let found = redirects
        .iter()
        .filter(|redirect| redirect.title == title)
        .min_by_key(|redirect| redirect.namespace);
    if found.is_none() {
        warn!(
            %title,
            candidates = redirects.len(),
            "highlighted redirect has no matching redirect"
        );
    }
    found
}

/// Builds a snippet from the start of the text when the backend returned no highlight.
///
/// Takes up to `context_lines` non-blank lines and at most `context_lines * context_chars`
/// characters, cutting at a word boundary where possible. The result is HTML-escaped.
pub fn highlight_none(text: &str, context_lines: usize, context_chars: usize) -> String {
    let budget = context_lines.saturating_mul(context_chars);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(context_lines)
        .collect();
    let joined = lines.join("\n");
    escape_html(truncate_chars(&joined, budget))
}

/// Truncates to at most `max` characters, preferring the last whitespace before the cut.
fn truncate_chars(text: &str, max: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(max) else {
        return text;
    };
    let head = &text[..cut];
    match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => head[..space].trim_end(),
        _ => head,
    }
}

/// Derives a section anchor from a heading.
///
/// Spaces become `_`. ASCII letters, digits and `-_.:` are kept; every other byte is written
/// as `.XX` in upper-case hex.
pub fn section_anchor(heading: &str) -> String {
    let mut anchor = String::with_capacity(heading.len());
    for byte in heading.trim().bytes() {
        match byte {
            b' ' => anchor.push('_'),
            b if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':') => {
                anchor.push(char::from(b));
            }
            b => anchor.push_str(&format!(".{b:02X}")),
        }
    }
    anchor
}
