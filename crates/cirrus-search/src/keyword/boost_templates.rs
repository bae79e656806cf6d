//! `boost-templates:` keyword.

use std::{collections::BTreeMap, sync::LazyLock};

use cirrus_query::{KeywordNode, KeywordSyntax, ValueSyntax};
use regex::Regex;
use tracing::debug;

use super::KeywordFeature;
use crate::{
    context::{CrossSearchStrategy, SearchContext},
    markup::compile_regex,
};

/// One `Template name|NNN%` entry, optionally followed by a space.
static BOOST_ENTRY: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"([^|]+)\|([0-9]+)% ?"));

/// Parses `Name|NNN% Other|MM%` into template weights.
///
/// Underscores in names become spaces. `NNN%` becomes the weight `NNN / 100`. Text that does
/// not fit the pattern is skipped, so a value with no valid entry yields an empty map.
pub fn parse_boost_templates(text: &str) -> BTreeMap<String, f64> {
    BOOST_ENTRY
        .captures_iter(text)
        .filter_map(|captures| {
            let name = captures.get(1)?.as_str().trim().replace('_', " ");
            let percent: f64 = captures.get(2)?.as_str().parse().ok()?;
            (!name.is_empty()).then_some((name, percent / 100.0))
        })
        .collect()
}

/// Boosts documents that use the listed templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoostTemplatesFeature;

/// Syntax of `boost-templates:`.
const SYNTAX: KeywordSyntax = KeywordSyntax {
    names: &["boost-templates"],
    negatable: false,
    value: ValueSyntax::Token,
};

impl KeywordFeature for BoostTemplatesFeature {
    fn syntax(&self) -> &KeywordSyntax {
        &SYNTAX
    }

    fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode) {
        let boosts = parse_boost_templates(&node.value);
        if boosts.is_empty() {
            debug!(value = %node.value, "no template boosts parsed");
        }
        ctx.merge_boost_templates(boosts);
    }

    fn cross_search_strategy(&self) -> CrossSearchStrategy {
        CrossSearchStrategy::HostWikiOnly
    }
}
