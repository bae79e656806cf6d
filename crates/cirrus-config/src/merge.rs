//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules on top of the defaults.

use std::path::PathBuf;

use crate::{
    Config, IndexSettings, MoreLikeThisSettings, PoolSettings, RescoreSettings, SearchSettings,
    SnippetSettings, SuggestSettings,
    parse::{
        RawConfig, RawIndexSettings, RawMoreLikeThisSettings, RawPoolSettings,
        RawRescoreSettings, RawSearchSettings, RawSnippetSettings, RawSuggestSettings,
    },
};

/// A parsed config file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first, lowest
/// precedence last.
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Lists: replaced as a whole by the highest precedence file that sets them
/// - Boost templates: merged by template name, first definition for each name wins
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut result = Config::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        apply_raw_config(&mut result, &parsed.config);
    }

    result
}

/// Applies every section present in `raw` to `result`.
fn apply_raw_config(result: &mut Config, raw: &RawConfig) {
    if let Some(ref index) = raw.index {
        apply_raw_index(&mut result.index, index);
    }
    if let Some(ref search) = raw.search {
        apply_raw_search(&mut result.search, search);
    }
    if let Some(ref rescore) = raw.rescore {
        apply_raw_rescore(&mut result.rescore, rescore);
    }
    if let Some(ref suggest) = raw.suggest {
        apply_raw_suggest(&mut result.suggest, suggest);
    }
    if let Some(ref snippet) = raw.snippet {
        apply_raw_snippet(&mut result.snippet, snippet);
    }
    if let Some(ref mlt) = raw.more_like_this {
        apply_raw_more_like_this(&mut result.more_like_this, mlt);
    }
    if let Some(ref templates) = raw.boost_templates {
        for (name, weight) in templates {
            result.boost_templates.insert(name.clone(), *weight);
        }
    }
    if let Some(ref pool) = raw.pool {
        apply_raw_pool(&mut result.pool, pool);
    }
}

/// Overwrites `target` when `value` is set.
fn overwrite<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}

/// Applies raw index settings to result.
fn apply_raw_index(result: &mut IndexSettings, raw: &RawIndexSettings) {
    overwrite(&mut result.base_name, raw.base_name.as_ref());
    overwrite(&mut result.content_namespaces, raw.content_namespaces.as_ref());
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    overwrite(&mut result.title_weight, raw.title_weight.as_ref());
    overwrite(&mut result.redirect_weight, raw.redirect_weight.as_ref());
    overwrite(&mut result.heading_weight, raw.heading_weight.as_ref());
    overwrite(&mut result.phrase_slop, raw.phrase_slop.as_ref());
    overwrite(
        &mut result.more_accurate_scoring,
        raw.more_accurate_scoring.as_ref(),
    );
    overwrite(&mut result.boost_links, raw.boost_links.as_ref());
    overwrite(&mut result.max_prefix_length, raw.max_prefix_length.as_ref());
}

/// Applies raw rescore settings to result.
fn apply_raw_rescore(result: &mut RescoreSettings, raw: &RawRescoreSettings) {
    overwrite(&mut result.phrase_boost, raw.phrase_boost.as_ref());
    overwrite(&mut result.window_size, raw.window_size.as_ref());
}

/// Applies raw suggester settings to result.
fn apply_raw_suggest(result: &mut SuggestSettings, raw: &RawSuggestSettings) {
    overwrite(&mut result.max_errors, raw.max_errors.as_ref());
    overwrite(&mut result.confidence, raw.confidence.as_ref());
    overwrite(&mut result.size, raw.size.as_ref());
    overwrite(&mut result.max_term_freq, raw.max_term_freq.as_ref());
    overwrite(&mut result.min_word_length, raw.min_word_length.as_ref());
}

/// Applies raw snippet settings to result.
fn apply_raw_snippet(result: &mut SnippetSettings, raw: &RawSnippetSettings) {
    overwrite(&mut result.context_lines, raw.context_lines.as_ref());
    overwrite(&mut result.context_chars, raw.context_chars.as_ref());
    overwrite(&mut result.text_fragment_size, raw.text_fragment_size.as_ref());
}

/// Applies raw "more like this" settings to result.
fn apply_raw_more_like_this(result: &mut MoreLikeThisSettings, raw: &RawMoreLikeThisSettings) {
    overwrite(&mut result.min_doc_freq, raw.min_doc_freq.as_ref());
    overwrite(&mut result.max_query_terms, raw.max_query_terms.as_ref());
    overwrite(&mut result.min_term_freq, raw.min_term_freq.as_ref());
    overwrite(
        &mut result.percent_terms_to_match,
        raw.percent_terms_to_match.as_ref(),
    );
    overwrite(&mut result.min_word_len, raw.min_word_len.as_ref());
    overwrite(&mut result.max_word_len, raw.max_word_len.as_ref());
}

/// Applies raw pool settings to result.
fn apply_raw_pool(result: &mut PoolSettings, raw: &RawPoolSettings) {
    overwrite(&mut result.name, raw.name.as_ref());
    overwrite(&mut result.max_concurrent, raw.max_concurrent.as_ref());
    overwrite(&mut result.timeout_ms, raw.timeout_ms.as_ref());
}
