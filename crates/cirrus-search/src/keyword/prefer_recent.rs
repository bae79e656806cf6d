//! `prefer-recent:` keyword.

use cirrus_query::{KeywordNode, KeywordSyntax, ValueSyntax};

use super::KeywordFeature;
use crate::context::{CrossSearchStrategy, PreferRecent, SearchContext};

/// Boosts recently edited pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferRecentFeature;

/// Syntax of `prefer-recent:`.
const SYNTAX: KeywordSyntax = KeywordSyntax {
    names: &["prefer-recent"],
    negatable: false,
    value: ValueSyntax::Optional,
};

/// Parses `decay,half_life` into recency parameters.
///
/// Either part may be missing or malformed, in which case its default is used. The decay
/// portion is clamped to `[0, 1]`; a non-positive half-life falls back to the default.
pub fn parse_prefer_recent(value: &str) -> PreferRecent {
    let defaults = PreferRecent::default();
    let mut parts = value.splitn(2, ',').map(str::trim);

    let decay_portion = parts
        .next()
        .and_then(|part| part.parse::<f64>().ok())
        .filter(|decay| decay.is_finite())
        .map_or(defaults.decay_portion, |decay| decay.clamp(0.0, 1.0));
    let half_life_days = parts
        .next()
        .and_then(|part| part.parse::<f64>().ok())
        .filter(|days| days.is_finite() && *days > 0.0)
        .unwrap_or(defaults.half_life_days);

    PreferRecent {
        decay_portion,
        half_life_days,
    }
}

impl KeywordFeature for PreferRecentFeature {
    fn syntax(&self) -> &KeywordSyntax {
        &SYNTAX
    }

    fn apply(&self, ctx: &mut SearchContext, node: &KeywordNode) {
        ctx.prefer_recent = Some(parse_prefer_recent(&node.value));
    }

    fn cross_search_strategy(&self) -> CrossSearchStrategy {
        CrossSearchStrategy::AllWikis
    }
}
