//! Configuration file parsing.
//!
//! Parses individual TOML files into intermediate `RawConfig` structures that preserve the
//! optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged. This mirrors the
/// TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[index]` section.
    pub index: Option<RawIndexSettings>,
    /// `[search]` section.
    pub search: Option<RawSearchSettings>,
    /// `[rescore]` section.
    pub rescore: Option<RawRescoreSettings>,
    /// `[suggest]` section.
    pub suggest: Option<RawSuggestSettings>,
    /// `[snippet]` section.
    pub snippet: Option<RawSnippetSettings>,
    /// `[more_like_this]` section.
    pub more_like_this: Option<RawMoreLikeThisSettings>,
    /// `[boost_templates]` table.
    pub boost_templates: Option<BTreeMap<String, f64>>,
    /// `[pool]` section.
    pub pool: Option<RawPoolSettings>,
}

/// Raw index settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Base index name.
    pub base_name: Option<String>,
    /// Content namespaces. Accepts a single number or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub content_namespaces: Option<Vec<i32>>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Title boost.
    pub title_weight: Option<f64>,
    /// Redirect title boost.
    pub redirect_weight: Option<f64>,
    /// Heading boost.
    pub heading_weight: Option<f64>,
    /// Default phrase slop.
    pub phrase_slop: Option<u32>,
    /// Distributed term statistics.
    pub more_accurate_scoring: Option<bool>,
    /// Link count boosting.
    pub boost_links: Option<bool>,
    /// Longest prefix search term.
    pub max_prefix_length: Option<usize>,
}

/// Raw rescore settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRescoreSettings {
    /// Phrase rescore weight.
    pub phrase_boost: Option<f64>,
    /// Rescore window.
    pub window_size: Option<usize>,
}

/// Raw suggester settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSuggestSettings {
    /// Maximum corrected terms.
    pub max_errors: Option<f64>,
    /// Confidence threshold.
    pub confidence: Option<f64>,
    /// Suggestions per generator.
    pub size: Option<usize>,
    /// Term frequency ceiling.
    pub max_term_freq: Option<f64>,
    /// Shortest corrected term.
    pub min_word_length: Option<usize>,
}

/// Raw snippet settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSnippetSettings {
    /// Fallback line count.
    pub context_lines: Option<usize>,
    /// Fallback characters per line.
    pub context_chars: Option<usize>,
    /// Body text fragment size.
    pub text_fragment_size: Option<usize>,
}

/// Raw "more like this" settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMoreLikeThisSettings {
    /// Minimum document frequency.
    pub min_doc_freq: Option<u32>,
    /// Maximum selected terms.
    pub max_query_terms: Option<u32>,
    /// Minimum term frequency.
    pub min_term_freq: Option<u32>,
    /// Fraction of terms to match.
    pub percent_terms_to_match: Option<f64>,
    /// Minimum word length.
    pub min_word_len: Option<u32>,
    /// Maximum word length.
    pub max_word_len: Option<u32>,
}

/// Raw pool settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPoolSettings {
    /// Pool name.
    pub name: Option<String>,
    /// Concurrency limit.
    pub max_concurrent: Option<usize>,
    /// Call timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}
