//! `linksto:` keyword.

use cirrus_query::{KeywordNode, KeywordSyntax, ValueSyntax};

use super::{KeywordFeature, add_filter};
use crate::{
    context::{CrossSearchStrategy, SearchContext},
    dsl,
};

/// Restricts results to pages linking to a given page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinksToFeature;

/// Syntax of `linksto:`.
const SYNTAX: KeywordSyntax = KeywordSyntax {
    names: &["linksto"],
    negatable: true,
    value: ValueSyntax::Token,
};

impl KeywordFeature for LinksToFeature {
    fn syntax(&self) -> &KeywordSyntax {
        &SYNTAX
    }

    fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode) {
        // Outgoing links are indexed in database-key form.
        let target = node.value.trim().replace(' ', "_");
        if target.is_empty() {
            return;
        }
        add_filter(ctx, node, dsl::match_field("outgoing_link", &target));
    }

    fn cross_search_strategy(&self) -> CrossSearchStrategy {
        CrossSearchStrategy::HostWikiOnly
    }
}
