//! Positional scanner for words and phrases.
//!
//! The scanner works on a half-open byte range `[start, end)` of the source query and
//! reports spans in source coordinates, so a caller can resume scanning at the end of
//! whatever was recognised. It never fails: input that is not a word or a phrase at the
//! given position yields `None`.

use crate::ast::{NegationMarker, QueryNode, Span};

/// A cursor over a bounded range of the query.
struct Scanner<'a> {
    /// The whole query string.
    input: &'a str,
    /// Current byte position.
    position: usize,
    /// Exclusive upper bound of the scan.
    end: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over `[start, end)`, clamped to the input.
    ///
    /// Returns `None` for an empty range or offsets that split a character.
    fn new(input: &'a str, start: usize, end: usize) -> Option<Self> {
        let end = end.min(input.len());
        if start >= end || !input.is_char_boundary(start) || !input.is_char_boundary(end) {
            return None;
        }
        Some(Self {
            input,
            position: start,
            end,
        })
    }

    /// Returns the unscanned remainder of the range.
    fn remaining(&self) -> &'a str {
        self.input.get(self.position..self.end).unwrap_or("")
    }

    /// Returns the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Returns the character after the next one.
    fn peek_second(&self) -> Option<char> {
        self.remaining().chars().nth(1)
    }

    /// Consumes and returns the next character.
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Consumes a negation marker if one is next.
    fn negation_marker(&mut self) -> Option<NegationMarker> {
        let marker = NegationMarker::from_char(self.peek()?)?;
        self.advance();
        Some(marker)
    }

    /// Reads text up to the next unescaped `"` or the end of the range, resolving escapes.
    ///
    /// Returns the text and the byte offsets in it of characters that were escaped. The
    /// closing quote, if any, is left unconsumed.
    fn read_until_quote(&mut self) -> (String, Vec<usize>) {
        let mut text = String::new();
        let mut escaped = Vec::new();
        while let Some(ch) = self.peek() {
            match ch {
                '"' => break,
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some(next) => {
                            escaped.push(text.len());
                            text.push(next);
                        }
                        None => text.push('\\'),
                    }
                }
                _ => {
                    self.advance();
                    text.push(ch);
                }
            }
        }
        (text, escaped)
    }
}

/// Returns true if a negation marker followed by `ch` acts as an operator.
fn starts_negated_term(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Scans a word token in `query[start..end]`.
///
/// A leading `"`, or a negation marker directly followed by `"`, means a phrase starts here
/// and `None` is returned. `-` and `!` negate only when followed by a letter, digit or
/// underscore; otherwise they are literal text. A backslash makes the following character
/// literal. The scan stops before an unescaped `"` or at `end`.
pub fn parse_words(query: &str, start: usize, end: usize) -> Option<QueryNode> {
    let mut scanner = Scanner::new(query, start, end)?;

    let first = scanner.peek()?;
    if first == '"' {
        return None;
    }
    let marker = match (NegationMarker::from_char(first), scanner.peek_second()) {
        (Some(_), Some('"')) => return None,
        (Some(_), Some(next)) if starts_negated_term(next) => scanner.negation_marker(),
        _ => None,
    };

    let text_start = scanner.position;
    let (text, escaped) = scanner.read_until_quote();
    if text.is_empty() {
        return None;
    }

    let words = QueryNode::Words {
        span: Span::new(text_start, scanner.position),
        text,
        escaped,
    };
    Some(match marker {
        Some(marker) => QueryNode::Negated {
            span: Span::new(start, scanner.position),
            child: Box::new(words),
            marker,
        },
        None => words,
    })
}

/// Scans a quoted phrase in `query[start..end]`.
///
/// The phrase may be preceded directly by a negation marker. An unterminated phrase runs to
/// `end`. A `~N` suffix directly after the closing quote is taken as the phrase slop when
/// `N` is an integer; any other suffix is left for the caller.
pub fn parse_phrase(query: &str, start: usize, end: usize) -> Option<QueryNode> {
    let mut scanner = Scanner::new(query, start, end)?;

    let marker = match (scanner.peek(), scanner.peek_second()) {
        (Some('"'), _) => None,
        (Some(first), Some('"')) => {
            NegationMarker::from_char(first)?;
            scanner.negation_marker()
        }
        _ => return None,
    };

    let phrase_start = scanner.position;
    scanner.advance();
    let (phrase, _) = scanner.read_until_quote();
    if scanner.peek() == Some('"') {
        scanner.advance();
    }
    let slop = read_slop(&mut scanner);

    let node = QueryNode::Phrase {
        span: Span::new(phrase_start, scanner.position),
        phrase,
        slop,
    };
    Some(match marker {
        Some(marker) => QueryNode::Negated {
            span: Span::new(start, scanner.position),
            child: Box::new(node),
            marker,
        },
        None => node,
    })
}

/// Consumes a `~N` slop suffix if the whole non-whitespace run after `~` is digits.
fn read_slop(scanner: &mut Scanner<'_>) -> Option<u32> {
    let suffix = scanner.remaining().strip_prefix('~')?;
    let len = suffix
        .find(char::is_whitespace)
        .unwrap_or(suffix.len());
    let digits = suffix.get(..len)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let slop = digits.parse().ok()?;
    scanner.position += 1 + len;
    Some(slop)
}

/// Returns the byte offset of the next unescaped whitespace at or after `start`.
///
/// Returns the query length when no whitespace follows.
pub fn token_end(query: &str, start: usize) -> usize {
    let Some(rest) = query.get(start..) else {
        return query.len();
    };
    let mut escaped = false;
    for (offset, ch) in rest.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch.is_whitespace() {
            return start + offset;
        }
    }
    query.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(query: &str) -> Option<QueryNode> {
        parse_words(query, 0, query.len())
    }

    fn text_of(node: &QueryNode) -> &str {
        match node {
            QueryNode::Words { text, .. } => text,
            QueryNode::Negated { child, .. } => text_of(child),
            other => panic!("not a word node: {other:?}"),
        }
    }

    #[test]
    fn plain_word() {
        assert_eq!(
            words("hello"),
            Some(QueryNode::Words {
                span: Span::new(0, 5),
                text: "hello".into(),
                escaped: Vec::new(),
            })
        );
    }

    #[test]
    fn leading_quote_is_not_a_word() {
        assert_eq!(words("\"hello\""), None);
        assert_eq!(words("-\"hello\""), None);
        assert_eq!(words("!\"hello\""), None);
    }

    #[test]
    fn negated_word() {
        let node = words("-test").unwrap();
        assert_eq!(
            node,
            QueryNode::Negated {
                span: Span::new(0, 5),
                child: Box::new(QueryNode::Words {
                    span: Span::new(1, 5),
                    text: "test".into(),
                    escaped: Vec::new(),
                }),
                marker: NegationMarker::Minus,
            }
        );
        let bang = words("!_x").unwrap();
        assert!(matches!(
            bang,
            QueryNode::Negated {
                marker: NegationMarker::Bang,
                ..
            }
        ));
    }

    #[test]
    fn lone_marker_is_literal() {
        assert_eq!(
            words("-"),
            Some(QueryNode::Words {
                span: Span::new(0, 1),
                text: "-".into(),
                escaped: Vec::new(),
            })
        );
        assert_eq!(text_of(&words("!").unwrap()), "!");
        assert_eq!(text_of(&words("--foo").unwrap()), "--foo");
        assert_eq!(text_of(&words("-*").unwrap()), "-*");
    }

    #[test]
    fn escapes_are_resolved() {
        assert_eq!(text_of(&words("a\\\"b").unwrap()), "a\"b");
        assert_eq!(text_of(&words("\\!a").unwrap()), "!a");
        assert_eq!(text_of(&words("\\-a").unwrap()), "-a");
        assert_eq!(text_of(&words("a\\\\b").unwrap()), "a\\b");
        assert_eq!(text_of(&words("trailing\\").unwrap()), "trailing\\");
    }

    #[test]
    fn escaped_offsets_recorded() {
        let Some(QueryNode::Words { text, escaped, .. }) = words("foo\\*a\\ b\\\\") else {
            panic!("expected a word node");
        };
        assert_eq!(text, "foo*a b\\");
        assert_eq!(escaped, vec![3, 5, 7]);
        assert!(matches!(
            words("trailing\\"),
            Some(QueryNode::Words { ref escaped, .. }) if escaped.is_empty()
        ));
    }

    #[test]
    fn escaped_marker_is_not_negation() {
        assert!(matches!(words("\\-foo"), Some(QueryNode::Words { .. })));
    }

    #[test]
    fn stops_before_unescaped_quote() {
        let node = words("foo\"bar\"").unwrap();
        assert_eq!(node.span(), Span::new(0, 3));
        assert_eq!(text_of(&node), "foo");
    }

    #[test]
    fn span_is_in_source_coordinates() {
        let query = "xx a\\!b yy";
        let node = parse_words(query, 3, 7).unwrap();
        assert_eq!(text_of(&node), "a!b");
        assert_eq!(node.span(), Span::new(3, 7));
    }

    #[test]
    fn respects_end_bound() {
        let node = parse_words("hello world", 0, 5).unwrap();
        assert_eq!(text_of(&node), "hello");
        assert_eq!(parse_words("hello", 5, 5), None);
        assert_eq!(parse_words("hello", 3, 100).map(|n| n.span()), Some(Span::new(3, 5)));
    }

    #[test]
    fn pathological_escapes() {
        let query = "a-a!a\\!\\\"".repeat(1000);
        let node = words(&query).unwrap();
        assert_eq!(text_of(&node), "a-a!a!\"".repeat(1000));
        assert_eq!(node.span(), Span::new(0, query.len()));
    }

    #[test]
    fn phrase_basic() {
        assert_eq!(
            parse_phrase("\"two words\" x", 0, 13),
            Some(QueryNode::Phrase {
                span: Span::new(0, 11),
                phrase: "two words".into(),
                slop: None,
            })
        );
    }

    #[test]
    fn phrase_with_slop() {
        let query = "\"a b\"~3 c";
        let node = parse_phrase(query, 0, query.len()).unwrap();
        assert_eq!(
            node,
            QueryNode::Phrase {
                span: Span::new(0, 7),
                phrase: "a b".into(),
                slop: Some(3),
            }
        );
    }

    #[test]
    fn phrase_with_bogus_suffix_leaves_it() {
        let query = "\"a b\"~x";
        let node = parse_phrase(query, 0, query.len()).unwrap();
        assert_eq!(node.span(), Span::new(0, 5));
        assert!(matches!(node, QueryNode::Phrase { slop: None, .. }));
    }

    #[test]
    fn negated_phrase() {
        let query = "-\"hello\"";
        let node = parse_phrase(query, 0, query.len()).unwrap();
        assert_eq!(node.span(), Span::new(0, 8));
        let QueryNode::Negated { child, marker, .. } = node else {
            panic!("expected negation");
        };
        assert_eq!(marker, NegationMarker::Minus);
        assert_eq!(child.span(), Span::new(1, 8));
    }

    #[test]
    fn unterminated_phrase_runs_to_end() {
        let query = "\"open ended";
        let node = parse_phrase(query, 0, query.len()).unwrap();
        assert_eq!(node.span(), Span::new(0, query.len()));
        assert!(matches!(node, QueryNode::Phrase { ref phrase, .. } if phrase == "open ended"));
    }

    #[test]
    fn phrase_escapes() {
        let query = r#""say \"hi\"""#;
        let node = parse_phrase(query, 0, query.len()).unwrap();
        assert!(matches!(node, QueryNode::Phrase { ref phrase, .. } if phrase == "say \"hi\""));
        assert_eq!(node.span().end, query.len());
    }

    #[test]
    fn not_a_phrase() {
        assert_eq!(parse_phrase("word", 0, 4), None);
        assert_eq!(parse_phrase("-word", 0, 5), None);
        assert_eq!(parse_phrase("x\"a\"", 0, 4), None);
    }

    #[test]
    fn token_end_skips_escaped_space() {
        assert_eq!(token_end("foo bar", 0), 3);
        assert_eq!(token_end("foo\\ bar baz", 0), 8);
        assert_eq!(token_end("foo", 0), 3);
        assert_eq!(token_end("a b", 2), 3);
        assert_eq!(token_end("a b", 10), 3);
    }
}
