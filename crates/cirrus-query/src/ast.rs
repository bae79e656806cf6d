//! Query abstract syntax tree.
//!
//! Represents a parsed query string. Every node records the byte span it was parsed from so
//! callers can highlight it or resume parsing from its end.

use std::{fmt, slice};

use crate::escape::{escape_phrase, escape_word};

/// A half-open `[start, end)` byte range into the original query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Creates a span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the number of source bytes covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the source text covered by this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// The character that introduced a negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegationMarker {
    /// `-term`
    Minus,
    /// `!term`
    Bang,
}

impl NegationMarker {
    /// Returns the marker for a character, if it is one.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '-' => Some(Self::Minus),
            '!' => Some(Self::Bang),
            _ => None,
        }
    }

    /// Returns the marker character.
    pub fn as_char(self) -> char {
        match self {
            Self::Minus => '-',
            Self::Bang => '!',
        }
    }
}

/// A recognised `keyword:value` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordNode {
    /// Source span, including any negation marker and quotes.
    pub span: Span,
    /// Registered keyword name, lower case (e.g. `incategory`).
    pub keyword: String,
    /// Value with surrounding quotes removed.
    pub value: String,
    /// Whether the value was double-quoted.
    pub quoted: bool,
    /// Whether the clause was prefixed with `-` or `!`.
    pub negated: bool,
}

/// A parsed query node.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// Plain term text, with escapes already resolved.
    Words {
        /// Source span.
        span: Span,
        /// Unescaped text.
        text: String,
        /// Sorted byte offsets in `text` of characters that were backslash-escaped.
        escaped: Vec<usize>,
    },

    /// A quoted phrase.
    Phrase {
        /// Source span, including quotes and any slop suffix.
        span: Span,
        /// Unescaped phrase content.
        phrase: String,
        /// Proximity slop from a `"..."~N` suffix.
        slop: Option<u32>,
    },

    /// A negated word or phrase.
    Negated {
        /// Source span, including the marker.
        span: Span,
        /// The negated node.
        child: Box<Self>,
        /// The marker that introduced the negation.
        marker: NegationMarker,
    },

    /// A keyword clause such as `incategory:Foo`.
    Keyword(KeywordNode),

    /// Implicit conjunction of sibling nodes, in source order.
    Boolean {
        /// Child nodes.
        children: Vec<Self>,
    },
}

impl QueryNode {
    /// Creates a Boolean node, flattening nested Booleans.
    ///
    /// A single child is returned as-is.
    pub fn boolean(children: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = children
            .into_iter()
            .flat_map(|node| match node {
                Self::Boolean { children } => children,
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1
            && let Some(only) = flattened.pop()
        {
            return only;
        }
        Self::Boolean {
            children: flattened,
        }
    }

    /// Returns the source span of this node.
    ///
    /// A Boolean spans from its first child's start to its last child's end.
    pub fn span(&self) -> Span {
        match self {
            Self::Words { span, .. } | Self::Phrase { span, .. } | Self::Negated { span, .. } => {
                *span
            }
            Self::Keyword(keyword) => keyword.span,
            Self::Boolean { children } => match (children.first(), children.last()) {
                (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
                _ => Span::default(),
            },
        }
    }

    /// Returns the source text this node was parsed from.
    pub fn text_in<'a>(&self, source: &'a str) -> &'a str {
        self.span().slice(source)
    }

    /// Calls `f` on this node and every descendant, parents before children.
    pub fn visit<F: FnMut(&Self)>(&self, f: &mut F) {
        f(self);
        match self {
            Self::Negated { child, .. } => child.visit(f),
            Self::Boolean { children } => {
                for child in children {
                    child.visit(f);
                }
            }
            Self::Words { .. } | Self::Phrase { .. } | Self::Keyword(_) => {}
        }
    }

    /// Returns the direct children of a Boolean, or this node alone.
    pub fn clauses(&self) -> &[Self] {
        match self {
            Self::Boolean { children } => children,
            other => slice::from_ref(other),
        }
    }

    /// Returns true if the node is, or contains, a phrase.
    pub fn contains_phrase(&self) -> bool {
        match self {
            Self::Phrase { .. } => true,
            Self::Negated { child, .. } => child.contains_phrase(),
            Self::Boolean { children } => children.iter().any(Self::contains_phrase),
            Self::Words { .. } | Self::Keyword(_) => false,
        }
    }

    /// Returns true if any word uses wildcard or fuzzy syntax.
    ///
    /// Escaped `*` and `~` are literal text and do not count.
    pub fn contains_special_syntax(&self) -> bool {
        match self {
            Self::Words { text, escaped, .. } => text.char_indices().any(|(offset, ch)| {
                matches!(ch, '*' | '~') && escaped.binary_search(&offset).is_err()
            }),
            Self::Negated { child, .. } => child.contains_special_syntax(),
            Self::Boolean { children } => children.iter().any(Self::contains_special_syntax),
            Self::Phrase { .. } | Self::Keyword(_) => false,
        }
    }

    /// Returns the keyword clauses in source order.
    pub fn keywords(&self) -> Vec<&KeywordNode> {
        self.clauses()
            .iter()
            .filter_map(|node| match node {
                Self::Keyword(keyword) => Some(keyword),
                _ => None,
            })
            .collect()
    }

    /// Renders the non-keyword part of the query as an escaped backend query string.
    ///
    /// Keyword clauses are dropped: they are applied separately as filters and boosts.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Words { text, escaped, .. } => escape_word(text, escaped),
            Self::Phrase { phrase, slop, .. } => {
                if phrase.trim().is_empty() {
                    return String::new();
                }
                match slop {
                    Some(slop) => format!("\"{}\"~{slop}", escape_phrase(phrase)),
                    None => format!("\"{}\"", escape_phrase(phrase)),
                }
            }
            Self::Negated { child, .. } => {
                let inner = child.to_query_string();
                if inner.is_empty() {
                    inner
                } else {
                    format!("-{inner}")
                }
            }
            Self::Keyword(_) => String::new(),
            Self::Boolean { children } => children
                .iter()
                .map(Self::to_query_string)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Formats the node as a tree with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Words { span, text, .. } => {
                writeln!(f, "{prefix}Words({text:?}) @{}..{}", span.start, span.end)
            }
            Self::Phrase { span, phrase, slop } => {
                write!(f, "{prefix}Phrase({phrase:?})")?;
                if let Some(slop) = slop {
                    write!(f, "~{slop}")?;
                }
                writeln!(f, " @{}..{}", span.start, span.end)
            }
            Self::Negated { child, marker, .. } => {
                writeln!(f, "{prefix}Negated({})", marker.as_char())?;
                child.fmt_tree(f, indent + 1)
            }
            Self::Keyword(keyword) => writeln!(
                f,
                "{prefix}Keyword({}{}:{:?})",
                if keyword.negated { "-" } else { "" },
                keyword.keyword,
                keyword.value
            ),
            Self::Boolean { children } => {
                writeln!(f, "{prefix}Boolean")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(start: usize, end: usize, text: &str) -> QueryNode {
        QueryNode::Words {
            span: Span::new(start, end),
            text: text.into(),
            escaped: Vec::new(),
        }
    }

    #[test]
    fn boolean_flattens_nested() {
        let nested = QueryNode::boolean(vec![
            words(0, 1, "a"),
            QueryNode::Boolean {
                children: vec![words(2, 3, "b"), words(4, 5, "c")],
            },
        ]);

        assert_eq!(
            nested,
            QueryNode::Boolean {
                children: vec![words(0, 1, "a"), words(2, 3, "b"), words(4, 5, "c")],
            }
        );
    }

    #[test]
    fn boolean_single_child_unwraps() {
        assert_eq!(
            QueryNode::boolean(vec![words(0, 1, "a")]),
            words(0, 1, "a")
        );
    }

    #[test]
    fn boolean_span_covers_children() {
        let node = QueryNode::boolean(vec![words(2, 5, "abc"), words(6, 9, "def")]);
        assert_eq!(node.span(), Span::new(2, 9));
    }

    #[test]
    fn query_string_skips_keywords_and_escapes() {
        let node = QueryNode::boolean(vec![
            QueryNode::Keyword(KeywordNode {
                span: Span::new(0, 14),
                keyword: "incategory".into(),
                value: "Foo".into(),
                quoted: false,
                negated: false,
            }),
            words(15, 20, "a(b)"),
            QueryNode::Negated {
                span: Span::new(21, 25),
                child: Box::new(words(22, 25, "bad")),
                marker: NegationMarker::Bang,
            },
            QueryNode::Phrase {
                span: Span::new(26, 36),
                phrase: "two words".into(),
                slop: Some(2),
            },
        ]);

        assert_eq!(
            node.to_query_string(),
            "a\\(b\\) -bad \"two words\"~2"
        );
    }

    #[test]
    fn empty_phrase_renders_nothing() {
        let node = QueryNode::Phrase {
            span: Span::new(0, 2),
            phrase: String::new(),
            slop: None,
        };
        assert_eq!(node.to_query_string(), "");
    }

    #[test]
    fn special_syntax_detection() {
        assert!(words(0, 3, "fo*").contains_special_syntax());
        assert!(words(0, 5, "foo~2").contains_special_syntax());
        assert!(!words(0, 3, "foo").contains_special_syntax());

        let literal = QueryNode::Words {
            span: Span::new(0, 6),
            text: "foo~2".into(),
            escaped: vec![3],
        };
        assert!(!literal.contains_special_syntax());
    }

    #[test]
    fn escaped_operators_render_literally() {
        let star = QueryNode::Words {
            span: Span::new(0, 5),
            text: "foo*".into(),
            escaped: vec![3],
        };
        assert_eq!(star.to_query_string(), "foo\\*");

        let space = QueryNode::Words {
            span: Span::new(0, 4),
            text: "a b".into(),
            escaped: vec![1],
        };
        assert_eq!(space.to_query_string(), "a\\ b");
    }

    #[test]
    fn visit_reaches_nested_nodes() {
        let node = QueryNode::boolean(vec![
            words(0, 1, "a"),
            QueryNode::Negated {
                span: Span::new(2, 4),
                child: Box::new(words(3, 4, "b")),
                marker: NegationMarker::Minus,
            },
        ]);
        let mut seen = Vec::new();
        node.visit(&mut |n| {
            if let QueryNode::Words { text, .. } = n {
                seen.push(text.clone());
            }
        });
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn text_in_slices_source() {
        let source = "foo -bar";
        let node = QueryNode::Negated {
            span: Span::new(4, 8),
            child: Box::new(words(5, 8, "bar")),
            marker: NegationMarker::Minus,
        };
        assert_eq!(node.text_in(source), "-bar");
    }

    #[test]
    fn display_renders_tree() {
        let node = QueryNode::boolean(vec![words(0, 1, "a"), words(2, 3, "b")]);
        let rendered = node.to_string();
        assert!(rendered.starts_with("Boolean\n"));
        assert!(rendered.contains("  Words(\"a\") @0..1"));
    }
}
