//! Recognition of `keyword:value` clauses.
//!
//! Keywords are matched at token starts only. A keyword name is matched case-insensitively
//! and must be followed directly by `:` and a value. Anything that does not fit the syntax is
//! left alone so the parser treats it as ordinary words.

use crate::ast::{KeywordNode, Span};

/// How a keyword's value is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSyntax {
    /// A double-quoted string or a bare run of non-space, non-quote characters. Required.
    Token,
    /// Like [`ValueSyntax::Token`], but the keyword also matches with no value at all.
    Optional,
    /// Everything up to the end of the query, with surrounding quotes trimmed.
    Rest,
}

/// Syntax description for one keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSyntax {
    /// Accepted names, lower case, without the trailing colon.
    pub names: &'static [&'static str],
    /// Whether a leading `-` or `!` is accepted.
    pub negatable: bool,
    /// How the value is delimited.
    pub value: ValueSyntax,
}

/// Anything that can recognise a keyword clause at a position in a query.
pub trait KeywordMatcher {
    /// Attempts to match a keyword clause starting exactly at `offset`.
    fn try_match(&self, query: &str, offset: usize) -> Option<KeywordNode>;
}

/// A matcher that recognises nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeywords;

impl KeywordMatcher for NoKeywords {
    fn try_match(&self, _query: &str, _offset: usize) -> Option<KeywordNode> {
        None
    }
}

impl KeywordMatcher for KeywordSyntax {
    fn try_match(&self, query: &str, offset: usize) -> Option<KeywordNode> {
        let rest = query.get(offset..)?;
        let negated = self.negatable && rest.starts_with(['-', '!']);
        let name_start = offset + usize::from(negated);
        let body = query.get(name_start..)?;

        let name = self.names.iter().find(|name| {
            body.get(..name.len())
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
                && body[name.len()..].starts_with(':')
        })?;
        let value_start = name_start + name.len() + 1;

        let (value, quoted, end) = match self.value {
            ValueSyntax::Token => read_value(query, value_start)?,
            ValueSyntax::Optional => {
                read_value(query, value_start).unwrap_or((String::new(), false, value_start))
            }
            ValueSyntax::Rest => read_rest(query, value_start)?,
        };

        Some(KeywordNode {
            span: Span::new(offset, end),
            keyword: (*name).to_string(),
            value,
            quoted,
            negated,
        })
    }
}

impl<M: KeywordMatcher, const N: usize> KeywordMatcher for [M; N] {
    fn try_match(&self, query: &str, offset: usize) -> Option<KeywordNode> {
        self.iter()
            .find_map(|matcher| matcher.try_match(query, offset))
    }
}

/// Reads a quoted or bare value starting at `start`.
///
/// Returns the value, whether it was quoted, and the end offset. Empty values and unclosed
/// quotes do not match.
fn read_value(query: &str, start: usize) -> Option<(String, bool, usize)> {
    let rest = query.get(start..)?;

    if let Some(inner) = rest.strip_prefix('"') {
        let close = inner.find('"')?;
        if close == 0 {
            return None;
        }
        return Some((inner[..close].to_string(), true, start + close + 2));
    }

    let len = rest
        .find(|c: char| c.is_whitespace() || c == '"')
        .unwrap_or(rest.len());
    if len == 0 {
        return None;
    }
    Some((rest[..len].to_string(), false, start + len))
}

/// Reads the remainder of the query as a value.
fn read_rest(query: &str, start: usize) -> Option<(String, bool, usize)> {
    let rest = query.get(start..)?;
    let trimmed_end = rest.trim_end();
    let raw = trimmed_end.trim_start();
    let quoted = raw.starts_with('"');
    let value = raw.trim_matches('"');
    if value.is_empty() {
        return None;
    }
    Some((value.to_string(), quoted, start + trimmed_end.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORY: KeywordSyntax = KeywordSyntax {
        names: &["incategory"],
        negatable: true,
        value: ValueSyntax::Token,
    };

    const PREFIX: KeywordSyntax = KeywordSyntax {
        names: &["prefix"],
        negatable: false,
        value: ValueSyntax::Rest,
    };

    const RECENT: KeywordSyntax = KeywordSyntax {
        names: &["prefer-recent"],
        negatable: false,
        value: ValueSyntax::Optional,
    };

    #[test]
    fn bare_value() {
        let node = CATEGORY.try_match("incategory:Foo bar", 0).unwrap();
        assert_eq!(node.keyword, "incategory");
        assert_eq!(node.value, "Foo");
        assert!(!node.quoted);
        assert!(!node.negated);
        assert_eq!(node.span, Span::new(0, 14));
    }

    #[test]
    fn quoted_value() {
        let node = CATEGORY.try_match("x incategory:\"Foo Bar\" y", 2).unwrap();
        assert_eq!(node.value, "Foo Bar");
        assert!(node.quoted);
        assert_eq!(node.span, Span::new(2, 22));
    }

    #[test]
    fn case_insensitive_name() {
        let node = CATEGORY.try_match("InCategory:Foo", 0).unwrap();
        assert_eq!(node.keyword, "incategory");
    }

    #[test]
    fn negated_clause() {
        let node = CATEGORY.try_match("-incategory:Foo", 0).unwrap();
        assert!(node.negated);
        assert_eq!(node.span, Span::new(0, 15));
        assert!(CATEGORY.try_match("!incategory:Foo", 0).unwrap().negated);
    }

    #[test]
    fn negation_rejected_when_not_negatable() {
        assert!(PREFIX.try_match("-prefix:Foo", 0).is_none());
    }

    #[test]
    fn malformed_values_do_not_match() {
        assert!(CATEGORY.try_match("incategory:", 0).is_none());
        assert!(CATEGORY.try_match("incategory: Foo", 0).is_none());
        assert!(CATEGORY.try_match("incategory:\"\"", 0).is_none());
        assert!(CATEGORY.try_match("incategory:\"Foo", 0).is_none());
        assert!(CATEGORY.try_match("incategoryFoo", 0).is_none());
        assert!(CATEGORY.try_match("category:Foo", 0).is_none());
    }

    #[test]
    fn bare_value_stops_at_quote() {
        let node = CATEGORY.try_match("incategory:Foo\"bar\"", 0).unwrap();
        assert_eq!(node.value, "Foo");
        assert_eq!(node.span.end, 14);
    }

    #[test]
    fn rest_value_consumes_remaining_query() {
        let node = PREFIX.try_match("foo prefix:\"Main Page/sub\" ", 4).unwrap();
        assert_eq!(node.value, "Main Page/sub");
        assert!(node.quoted);
        assert_eq!(node.span, Span::new(4, 26));
    }

    #[test]
    fn optional_value_may_be_missing() {
        let node = RECENT.try_match("prefer-recent: foo", 0).unwrap();
        assert_eq!(node.value, "");
        assert_eq!(node.span, Span::new(0, 14));

        let node = RECENT.try_match("prefer-recent:0.5,30", 0).unwrap();
        assert_eq!(node.value, "0.5,30");
    }

    #[test]
    fn array_of_matchers_takes_first_match() {
        let matchers = [PREFIX, CATEGORY];
        let node = matchers.try_match("incategory:Foo", 0).unwrap();
        assert_eq!(node.keyword, "incategory");
        assert!(matchers.try_match("plain", 0).is_none());
    }

    #[test]
    fn multibyte_text_does_not_panic() {
        assert!(CATEGORY.try_match("ïñçåtégory:Foo", 0).is_none());
        assert!(CATEGORY.try_match("日本", 0).is_none());
    }
}
