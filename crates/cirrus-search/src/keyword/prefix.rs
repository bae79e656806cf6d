//! `prefix:` keyword.

use cirrus_query::{KeywordNode, KeywordSyntax, ValueSyntax};

use super::{KeywordFeature, SuggestPlacement};
use crate::{
    context::{CrossSearchStrategy, SearchContext},
    dsl,
};

/// Restricts results to titles starting with the rest of the query.
///
/// The keyword consumes everything after it, so it goes last in the query and last in a
/// spelling suggestion.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixFeature;

/// Syntax of `prefix:`.
const SYNTAX: KeywordSyntax = KeywordSyntax {
    names: &["prefix"],
    negatable: false,
    value: ValueSyntax::Rest,
};

impl KeywordFeature for PrefixFeature {
    fn syntax(&self) -> &KeywordSyntax {
        &SYNTAX
    }

    fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode) {
        ctx.add_filter(dsl::title_prefix(&node.value));
    }

    fn cross_search_strategy(&self) -> CrossSearchStrategy {
        CrossSearchStrategy::AllWikis
    }

    fn suggest_placement(&self) -> SuggestPlacement {
        SuggestPlacement::Suffix
    }
}

#[cfg(test)]
mod tests {
    use cirrus_query::KeywordMatcher;

    use super::*;

    #[test]
    fn consumes_rest_of_query() {
        let query = "prefix:Main Pa  ";
        let node = SYNTAX.try_match(query, 0).unwrap();
        assert_eq!(node.value, "Main Pa");
        assert_eq!(node.span.end, "prefix:Main Pa".len());

        let mut ctx = SearchContext::new();
        PrefixFeature.apply(&mut ctx, &node);
        assert_eq!(ctx.filters, vec![dsl::title_prefix("Main Pa")]);
    }

    #[test]
    fn empty_rest_does_not_match() {
        assert!(SYNTAX.try_match("prefix:   ", 0).is_none());
    }
}
