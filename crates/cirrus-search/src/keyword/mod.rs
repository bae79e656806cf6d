//! Keyword features: `name:value` clauses that filter or boost a full-text search.
//!
//! Each feature declares its syntax, how it changes the [`SearchContext`], and whether the
//! change means the same thing on other wikis. The [`KeywordRegistry`] holds the features in
//! evaluation order; the first feature whose syntax matches at a position wins.

mod boost_templates;
mod category;
mod links;
mod prefer_recent;
mod prefix;
mod template;
mod title;

pub use boost_templates::{BoostTemplatesFeature, parse_boost_templates};
pub use category::InCategoryFeature;
use cirrus_query::{KeywordMatcher, KeywordNode, KeywordSyntax, QueryNode};
pub use links::LinksToFeature;
pub use prefer_recent::{PreferRecentFeature, parse_prefer_recent};
pub use prefix::PrefixFeature;
use serde_json::Value;
pub use template::HasTemplateFeature;
pub use title::InTitleFeature;

use crate::context::{CrossSearchStrategy, SearchContext};

/// Where the raw text of a keyword goes when a spelling suggestion is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestPlacement {
    /// Before the corrected text.
    Prefix,
    /// After the corrected text.
    Suffix,
}

/// A keyword that contributes filters, boosts or query clauses.
pub trait KeywordFeature: Send + Sync {
    /// Returns the keyword's syntax.
    fn syntax(&self) -> &KeywordSyntax;

    /// Applies a matched clause to the context.
    fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode);

    /// Returns whether the clause can be replayed on other wikis.
    fn cross_search_strategy(&self) -> CrossSearchStrategy;

    /// Returns where the clause text goes in a spelling suggestion.
    fn suggest_placement(&self) -> SuggestPlacement {
        SuggestPlacement::Prefix
    }
}

/// Ordered set of keyword features.
pub struct KeywordRegistry {
    /// Features in evaluation order.
    features: Vec<Box<dyn KeywordFeature>>,
}

impl KeywordRegistry {
    /// Creates a registry with no features.
    pub fn empty() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    /// Appends a feature. Earlier features take precedence.
    pub fn with_feature(mut self, feature: impl KeywordFeature + 'static) -> Self {
        self.features.push(Box::new(feature));
        self
    }

    /// Returns every registered keyword name, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.features
            .iter()
            .flat_map(|feature| feature.syntax().names.iter().copied())
            .collect()
    }

    /// Returns the feature handling `keyword`.
    fn feature_for(&self, keyword: &str) -> Option<&dyn KeywordFeature> {
        self.features
            .iter()
            .find(|feature| feature.syntax().names.contains(&keyword))
            .map(AsRef::as_ref)
    }

    /// Applies one keyword clause parsed from `source`.
    ///
    /// Returns false if no registered feature handles the clause.
    pub fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode, source: &str) -> bool {
        let Some(feature) = self.feature_for(&node.keyword) else {
            return false;
        };
        feature.apply(ctx, node);
        ctx.restrict_cross_search(feature.cross_search_strategy());

        let raw = node.span.slice(source).trim();
        match feature.suggest_placement() {
            SuggestPlacement::Prefix => ctx.add_suggest_prefix(raw),
            SuggestPlacement::Suffix => ctx.add_suggest_suffix(raw),
        }
        true
    }

    /// Applies every keyword clause in a parsed query, in source order.
    pub fn apply_all(&self, ctx: &mut SearchContext, query: &QueryNode, source: &str) {
        for node in query.keywords() {
            self.apply(ctx, node, source);
        }
    }
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::empty()
            .with_feature(BoostTemplatesFeature)
            .with_feature(InCategoryFeature)
            .with_feature(InTitleFeature)
            .with_feature(HasTemplateFeature)
            .with_feature(LinksToFeature)
            .with_feature(PreferRecentFeature)
            .with_feature(PrefixFeature)
    }
}

impl KeywordMatcher for KeywordRegistry {
    fn try_match(&self, query: &str, offset: usize) -> Option<KeywordNode> {
        self.features
            .iter()
            .find_map(|feature| feature.syntax().try_match(query, offset))
    }
}

/// Splits a `|`-delimited keyword value into trimmed, non-empty names.
fn split_names(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.replace('_', " "))
        .collect()
}

/// Adds `filter` as a positive or negative filter depending on the clause.
fn add_filter(ctx: &mut SearchContext, node: &KeywordNode, filter: Value) {
    if node.negated {
        ctx.add_not_filter(filter);
    } else {
        ctx.add_filter(filter);
    }
}
