//! `intitle:` keyword.

use cirrus_query::{KeywordNode, KeywordSyntax, ValueSyntax, escape, escape_phrase};

use super::KeywordFeature;
use crate::{
    context::{CrossSearchStrategy, SearchContext},
    dsl,
};

/// Requires words or a phrase to appear in the title.
///
/// A positive clause becomes part of the scored query string; a negated clause is a filter,
/// since it cannot contribute to the score.
#[derive(Debug, Clone, Copy, Default)]
pub struct InTitleFeature;

/// Syntax of `intitle:`.
const SYNTAX: KeywordSyntax = KeywordSyntax {
    names: &["intitle"],
    negatable: true,
    value: ValueSyntax::Token,
};

/// Renders the clause value as query-string syntax.
fn title_query(node: &KeywordNode) -> String {
    if node.quoted {
        format!("\"{}\"", escape_phrase(&node.value))
    } else {
        escape(&node.value)
    }
}

impl KeywordFeature for InTitleFeature {
    fn syntax(&self) -> &KeywordSyntax {
        &SYNTAX
    }

    fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode) {
        let query = title_query(node);
        if node.negated {
            ctx.add_not_filter(dsl::query_string_filter(&query, &["title"]));
        } else if node.quoted {
            ctx.add_query_fragment(format!("title:{query}"));
        } else {
            ctx.add_query_fragment(format!("title:({query})"));
        }
    }

    fn cross_search_strategy(&self) -> CrossSearchStrategy {
        CrossSearchStrategy::AllWikis
    }
}

#[cfg(test)]
mod tests {
    use cirrus_query::KeywordMatcher;
    use serde_json::json;

    use super::*;

    fn apply(query: &str) -> SearchContext {
        let mut ctx = SearchContext::new();
        let node = SYNTAX.try_match(query, 0).unwrap();
        InTitleFeature.apply(&mut ctx, &node);
        ctx
    }

    #[test]
    fn bare_word_fragment() {
        let ctx = apply("intitle:foo(bar)");
        assert_eq!(ctx.query_fragments, vec!["title:(foo\\(bar\\))"]);
        assert!(ctx.not_filters.is_empty());
    }

    #[test]
    fn quoted_phrase_fragment() {
        let ctx = apply("intitle:\"hello world\"");
        assert_eq!(ctx.query_fragments, vec!["title:\"hello world\""]);
    }

    #[test]
    fn negated_becomes_filter() {
        let ctx = apply("-intitle:draft");
        assert!(ctx.query_fragments.is_empty());
        assert_eq!(
            ctx.not_filters,
            vec![json!({"query_string": {
                "query": "draft",
                "fields": ["title"],
                "default_operator": "AND",
            }})]
        );
    }
}
