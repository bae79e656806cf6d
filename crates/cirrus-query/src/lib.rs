//! Query parsing and escaping for wiki full-text search.
//!
//! User queries are free text with a little structure:
//!
//! - **Words**: `rust` - plain terms, wildcards (`ru*`) and fuzzy suffixes (`rust~`) kept
//! - **Phrases**: `"error handling"` - with an optional slop suffix (`"a b"~2`)
//! - **Negation**: `-deprecated` or `!deprecated`
//! - **Keywords**: `incategory:Foo` - recognised by a caller-supplied [`KeywordMatcher`]
//!
//! Parsing never fails: anything that does not fit the syntax is kept as literal text. The
//! non-keyword remainder is rendered back into an escaped backend query string with
//! [`QueryNode::to_query_string`].
//!
//! # Example
//!
//! ```
//! use cirrus_query::{KeywordSyntax, ValueSyntax, parse_with_keywords};
//!
//! let category = KeywordSyntax {
//!     names: &["incategory"],
//!     negatable: true,
//!     value: ValueSyntax::Token,
//! };
//! let node = parse_with_keywords("incategory:Foo a(b)", &category).unwrap();
//! assert_eq!(node.keywords()[0].value, "Foo");
//! assert_eq!(node.to_query_string(), "a\\(b\\)");
//! ```

#![warn(missing_docs)]

mod ast;
mod escape;
mod keyword;
mod lexer;
mod parser;

pub use ast::{KeywordNode, NegationMarker, QueryNode, Span};
pub use escape::{
    balance_quotes, escape, escape_phrase, escape_reserved, escape_term, escape_word,
    fix_fuzzy,
};
pub use keyword::{KeywordMatcher, KeywordSyntax, NoKeywords, ValueSyntax};
pub use lexer::{parse_phrase, parse_words, token_end};
pub use parser::{parse, parse_with_keywords};
