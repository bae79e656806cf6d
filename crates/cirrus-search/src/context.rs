//! Request-scoped state accumulated while a query is being built.
//!
//! Keyword features write into a [`SearchContext`]; the searcher then reads it back to
//! assemble the backend request. A context belongs to a single request and is never shared.

use std::collections::BTreeMap;

use serde_json::Value;

/// Whether a query can be replayed unchanged against other wikis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossSearchStrategy {
    /// The query means the same thing on every wiki.
    #[default]
    AllWikis,
    /// The query depends on data local to the host wiki (categories, templates, links).
    HostWikiOnly,
}

impl CrossSearchStrategy {
    /// Combines two strategies, keeping the more restrictive one.
    pub fn intersect(self, other: Self) -> Self {
        match (self, other) {
            (Self::AllWikis, Self::AllWikis) => Self::AllWikis,
            _ => Self::HostWikiOnly,
        }
    }
}

/// Recency boost parameters from `prefer-recent:`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferRecent {
    /// Portion of the score subject to decay, in `[0, 1]`.
    pub decay_portion: f64,
    /// Age in days at which the decaying portion is halved.
    pub half_life_days: f64,
}

impl Default for PreferRecent {
    fn default() -> Self {
        Self {
            decay_portion: 0.6,
            half_life_days: 160.0,
        }
    }
}

/// Mutable state for one search request.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    /// Filters every result must match.
    pub filters: Vec<Value>,
    /// Filters no result may match.
    pub not_filters: Vec<Value>,
    /// Template boosts given in the query. Overrides configured boosts when present.
    pub boost_templates_from_query: Option<BTreeMap<String, f64>>,
    /// Extra query-string clauses appended to the escaped residual text.
    pub query_fragments: Vec<String>,
    /// Text sent to the phrase suggester.
    pub suggest: Option<String>,
    /// Raw keyword text placed before a spelling suggestion.
    pub suggest_prefixes: Vec<String>,
    /// Raw keyword text placed after a spelling suggestion.
    pub suggest_suffixes: Vec<String>,
    /// Recency boost, if requested.
    pub prefer_recent: Option<PreferRecent>,
    /// Accumulated cross-wiki eligibility.
    pub cross_search_strategy: CrossSearchStrategy,
}

impl SearchContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter every result must match.
    pub fn add_filter(&mut self, filter: Value) {
        self.filters.push(filter);
    }

    /// Adds a filter no result may match.
    pub fn add_not_filter(&mut self, filter: Value) {
        self.not_filters.push(filter);
    }

    /// Appends a clause to the full-text query string.
    pub fn add_query_fragment(&mut self, fragment: impl Into<String>) {
        self.query_fragments.push(fragment.into());
    }

    /// Merges template boosts from the query. Later entries replace earlier ones by name.
    pub fn merge_boost_templates(&mut self, boosts: BTreeMap<String, f64>) {
        self.boost_templates_from_query
            .get_or_insert_with(BTreeMap::new)
            .extend(boosts);
    }

    /// Records keyword text to re-attach before a spelling suggestion.
    pub fn add_suggest_prefix(&mut self, text: impl Into<String>) {
        self.suggest_prefixes.push(text.into());
    }

    /// Records keyword text to re-attach after a spelling suggestion.
    pub fn add_suggest_suffix(&mut self, text: impl Into<String>) {
        self.suggest_suffixes.push(text.into());
    }

    /// Narrows the cross-wiki strategy.
    pub fn restrict_cross_search(&mut self, strategy: CrossSearchStrategy) {
        self.cross_search_strategy = self.cross_search_strategy.intersect(strategy);
    }
}
