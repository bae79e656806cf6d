//! Wiki full-text search front end.
//!
//! This crate turns user queries into Elasticsearch-style search requests and shapes the
//! responses into results. It handles:
//! - Keyword clauses (`incategory:`, `intitle:`, `prefer-recent:` and others) as filters and
//!   boosts
//! - Prefix, full-text and "more like this" request building
//! - Bounded, timed concurrency for backend calls
//! - Snippet escaping, redirect resolution and spelling suggestions
//!
//! The backend transport is supplied by the caller through [`SearchBackend`].
//!
//! # Example
//!
//! ```
//! use cirrus_query::parse_with_keywords;
//! use cirrus_search::{KeywordRegistry, SearchContext};
//!
//! let registry = KeywordRegistry::default();
//! let query = "incategory:Cats -intitle:draft whiskers";
//! let node = parse_with_keywords(query, &registry).unwrap();
//!
//! let mut ctx = SearchContext::new();
//! registry.apply_all(&mut ctx, &node, query);
//!
//! assert_eq!(ctx.filters.len(), 1);
//! assert_eq!(ctx.not_filters.len(), 1);
//! assert_eq!(node.to_query_string(), "whiskers");
//! ```

#![warn(missing_docs)]

mod backend;
mod context;
pub mod dsl;
mod error;
mod highlight;
mod keyword;
mod markup;
mod pool;
mod request;
mod result;
mod searcher;

pub use backend::{
    DocumentLookup, Hit, HitSource, Hits, IndexTarget, RedirectSource, SearchBackend,
    SearchResponse, SuggestEntry, SuggestOption, TotalHits,
};
pub use context::{CrossSearchStrategy, PreferRecent, SearchContext};
pub use error::{BackendError, SearchError};
pub use highlight::{
    escape_highlighted_text, escape_html, escape_suggestion, find_redirect_title,
    highlight_none, section_anchor, strip_highlighting,
};
pub use keyword::{
    BoostTemplatesFeature, HasTemplateFeature, InCategoryFeature, InTitleFeature,
    KeywordFeature, KeywordRegistry, LinksToFeature, PreferRecentFeature, PrefixFeature,
    SuggestPlacement, parse_boost_templates, parse_prefer_recent,
};
pub use markup::strip_markup;
pub use pool::ConcurrencyGate;
pub use request::{
    DirectGenerator, HIGHLIGHT_POST, HIGHLIGHT_PRE, Highlight, HighlightField, PhraseSuggester,
    REDIRECT_SUGGESTION, Rescore, RescoreQuery, SUGGEST_POST, SUGGEST_PRE, SearchRequest,
    SearchType, Suggest, SuggestGenerator, SuggestHighlight, TITLE_SUGGESTION,
};
pub use result::{FullTextResult, ResultSet, SearchResult, Suggestion, TitleResult};
pub use searcher::{
    BACKEND_ERROR_KEY, ResultShape, SearchClient, SearchOutcome, SearchParams, SearchStatus,
    Searcher,
};
