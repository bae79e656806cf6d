//! `hastemplate:` keyword.

use cirrus_query::{KeywordNode, KeywordSyntax, ValueSyntax};

use super::{KeywordFeature, add_filter, split_names};
use crate::{
    context::{CrossSearchStrategy, SearchContext},
    dsl,
};

/// Namespace assumed for template names given without one.
const TEMPLATE_NAMESPACE: &str = "Template";

/// Restricts results to pages that transclude any of the listed templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasTemplateFeature;

/// Syntax of `hastemplate:`.
const SYNTAX: KeywordSyntax = KeywordSyntax {
    names: &["hastemplate"],
    negatable: true,
    value: ValueSyntax::Token,
};

/// Adds the template namespace to a bare template name.
fn qualify(name: String) -> String {
    if name.contains(':') {
        name
    } else {
        format!("{TEMPLATE_NAMESPACE}:{name}")
    }
}

impl KeywordFeature for HasTemplateFeature {
    fn syntax(&self) -> &KeywordSyntax {
        &SYNTAX
    }

    fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode) {
        let templates: Vec<String> = split_names(&node.value).into_iter().map(qualify).collect();
        if templates.is_empty() {
            return;
        }
        add_filter(ctx, node, dsl::match_any("template", &templates));
    }

    fn cross_search_strategy(&self) -> CrossSearchStrategy {
        CrossSearchStrategy::HostWikiOnly
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
        HasTemplateFeature.apply(&mut ctx, &node);
        ctx
    }

    #[test]
    fn bare_name_gets_namespace() {
        let ctx = apply("hastemplate:Citation_needed");
        assert_eq!(
            ctx.filters,
            vec![json!({"match": {"template": "Template:Citation needed"}})]
        );
    }

    #[test]
    fn explicit_namespace_kept() {
        let ctx = apply("hastemplate:\"Module:Infobox\"");
        assert_eq!(
            ctx.filters,
            vec![json!({"match": {"template": "Module:Infobox"}})]
        );
    }

    #[test]
    fn negated_list() {
        let ctx = apply("!hastemplate:A|B");
        assert_eq!(
            ctx.not_filters,
            vec![json!({"bool": {"should": [
                {"match": {"template": "Template:A"}},
                {"match": {"template": "Template:B"}},
            ]}})]
        );
    }
}
