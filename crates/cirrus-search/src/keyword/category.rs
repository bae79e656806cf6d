//! `incategory:` keyword.

use cirrus_query::{KeywordNode, KeywordSyntax, ValueSyntax};

use super::{KeywordFeature, add_filter, split_names};
use crate::{
    context::{CrossSearchStrategy, SearchContext},
    dsl,
};

/// Restricts results to pages in any of the listed categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct InCategoryFeature;

/// Syntax of `incategory:`.
const SYNTAX: KeywordSyntax = KeywordSyntax {
    names: &["incategory"],
    negatable: true,
    value: ValueSyntax::Token,
};

impl KeywordFeature for InCategoryFeature {
    fn syntax(&self) -> &KeywordSyntax {
        &SYNTAX
    }

    fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode) {
        let categories = split_names(&node.value);
        if categories.is_empty() {
            return;
        }
        add_filter(ctx, node, dsl::match_any("category", &categories));
    }

    fn cross_search_strategy(&self) -> CrossSearchStrategy {
        CrossSearchStrategy::HostWikiOnly
    }
}
