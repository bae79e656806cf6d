//! Query parser.
//!
//! Splits a query string into keyword clauses, phrases and words. The grammar is flat: the
//! result is a single node or an implicit conjunction of nodes in source order.
//!
//! At each token start the parser tries, in order:
//!
//! 1. a keyword clause from the supplied [`KeywordMatcher`]
//! 2. a phrase, optionally negated
//! 3. a word run bounded by the next unescaped whitespace
//!
//! Parsing never fails. Malformed keyword clauses and unknown `name:value` pairs are kept as
//! plain words.

use crate::{
    ast::QueryNode,
    keyword::{KeywordMatcher, NoKeywords},
    lexer::{parse_phrase, parse_words, token_end},
};

/// Cursor-based parser over a query string.
struct Parser<'a> {
    /// The query being parsed.
    input: &'a str,
    /// Current byte position.
    position: usize,
    /// Keyword recogniser consulted at every token start.
    keywords: &'a dyn KeywordMatcher,
}

impl<'a> Parser<'a> {
    /// Creates a parser for the given input.
    fn new(input: &'a str, keywords: &'a dyn KeywordMatcher) -> Self {
        Self {
            input,
            position: 0,
            keywords,
        }
    }

    /// Parses the whole input.
    fn parse(mut self) -> Option<QueryNode> {
        let mut nodes = Vec::new();
        while let Some(node) = self.next_node() {
            nodes.push(node);
        }
        if nodes.is_empty() {
            return None;
        }
        Some(QueryNode::boolean(nodes))
    }

    /// Returns the next node, or None at end of input.
    fn next_node(&mut self) -> Option<QueryNode> {
        loop {
            self.skip_whitespace();
            let start = self.position;
            let next = self.input.get(start..)?.chars().next()?;

            let node = self
                .keywords
                .try_match(self.input, start)
                .map(QueryNode::Keyword)
                .or_else(|| parse_phrase(self.input, start, self.input.len()))
                .or_else(|| parse_words(self.input, start, token_end(self.input, start)));

            // Always make progress, even if nothing was recognised.
            self.position = node
                .as_ref()
                .map_or(start, |n| n.span().end)
                .max(start + next.len_utf8());

            if node.is_some() {
                return node;
            }
        }
    }

    /// Advances past whitespace.
    fn skip_whitespace(&mut self) {
        let rest = self.input.get(self.position..).unwrap_or("");
        self.position += rest.len() - rest.trim_start().len();
    }
}

/// Parses a query string with no keyword support.
///
/// Returns `None` for an empty or all-whitespace query.
pub fn parse(input: &str) -> Option<QueryNode> {
    parse_with_keywords(input, &NoKeywords)
}

/// Parses a query string, recognising keyword clauses with `keywords`.
pub fn parse_with_keywords(input: &str, keywords: &dyn KeywordMatcher) -> Option<QueryNode> {
    Parser::new(input, keywords).parse()
}
