//! Configuration for the wiki search front end.
//!
//! Settings are read from TOML files. Each file is parsed into a [`RawConfig`] where every
//! value is optional, then the files are merged in precedence order into a fully resolved
//! [`Config`]. Values no file sets fall back to the defaults documented on each field.
//!
//! ```toml
//! [index]
//! base_name = "enwiki"
//! content_namespaces = [0, 14]
//!
//! [search]
//! title_weight = 20.0
//!
//! [boost_templates]
//! "Template:Featured article" = 2.0
//! ```

#![warn(missing_docs)]

mod error;
mod merge;
mod parse;
#[cfg(test)]
mod test_support;
mod validate;

use std::{collections::BTreeMap, path::PathBuf, time::Duration};

pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawIndexSettings, RawMoreLikeThisSettings, RawPoolSettings, RawRescoreSettings,
    RawSearchSettings, RawSnippetSettings, RawSuggestSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Index naming and namespace layout.
    pub index: IndexSettings,
    /// Full-text query shape.
    pub search: SearchSettings,
    /// Phrase rescoring.
    pub rescore: RescoreSettings,
    /// Spelling suggestions.
    pub suggest: SuggestSettings,
    /// Snippet fallback and fragment sizes.
    pub snippet: SnippetSettings,
    /// "More like this" tuning.
    pub more_like_this: MoreLikeThisSettings,
    /// Template name to score multiplier, applied to every full-text search.
    pub boost_templates: BTreeMap<String, f64>,
    /// Backend concurrency gate.
    pub pool: PoolSettings,
}

impl Config {
    /// Loads configuration from a list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// Warnings never prevent the configuration from being used.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective configuration to TOML.
    ///
    /// The output has the same layout as a config file and can be parsed back.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeToml)
    }
}

/// Index naming and namespace layout.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Base name for index partitions (`<base>`, `<base>_content`, `<base>_general`).
    pub base_name: String,
    /// Namespaces stored in the content partition. Defaults to `[0]`.
    pub content_namespaces: Vec<i32>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            base_name: String::from("wiki"),
            content_namespaces: vec![0],
        }
    }
}

impl IndexSettings {
    /// Returns true if `namespace` lives in the content partition.
    pub fn is_content_namespace(&self, namespace: i32) -> bool {
        self.content_namespaces.contains(&namespace)
    }
}

/// Full-text query shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Boost for matches in the title.
    pub title_weight: f64,
    /// Boost for matches in redirect titles.
    pub redirect_weight: f64,
    /// Boost for matches in section headings.
    pub heading_weight: f64,
    /// Slop applied to phrases without an explicit `~N`.
    pub phrase_slop: u32,
    /// Ask the backend for distributed term statistics.
    pub more_accurate_scoring: bool,
    /// Multiply scores by a function of incoming link counts.
    pub boost_links: bool,
    /// Longest accepted prefix search term, in characters.
    pub max_prefix_length: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            title_weight: 20.0,
            redirect_weight: 15.0,
            heading_weight: 5.0,
            phrase_slop: 1,
            more_accurate_scoring: true,
            boost_links: true,
            max_prefix_length: 255,
        }
    }
}

/// Phrase rescoring of the top results.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RescoreSettings {
    /// Weight of the phrase rescore query. Values `<= 1.0` disable rescoring.
    pub phrase_boost: f64,
    /// Number of top results rescored per shard.
    pub window_size: usize,
}

impl Default for RescoreSettings {
    fn default() -> Self {
        Self {
            phrase_boost: 10.0,
            window_size: 1024,
        }
    }
}

impl RescoreSettings {
    /// Returns true if phrase rescoring should be requested.
    pub fn enabled(&self) -> bool {
        self.phrase_boost > 1.0
    }
}

/// Phrase suggester settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SuggestSettings {
    /// Maximum number of misspelled terms corrected per suggestion.
    pub max_errors: f64,
    /// Minimum score ratio of a suggestion over the original text.
    pub confidence: f64,
    /// Suggestions returned per generator.
    pub size: usize,
    /// Terms more frequent than this (ratio or count) are not corrected.
    pub max_term_freq: f64,
    /// Shortest term that is corrected.
    pub min_word_length: usize,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            max_errors: 5.0,
            confidence: 2.0,
            size: 1,
            max_term_freq: 0.5,
            min_word_length: 2,
        }
    }
}

/// Snippet settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnippetSettings {
    /// Lines of body text used when the backend returns no highlight.
    pub context_lines: usize,
    /// Characters kept per fallback line.
    pub context_chars: usize,
    /// Fragment size requested for body text highlights.
    pub text_fragment_size: usize,
}

impl Default for SnippetSettings {
    fn default() -> Self {
        Self {
            context_lines: 2,
            context_chars: 75,
            text_fragment_size: 150,
        }
    }
}

/// "More like this" query tuning, passed through to the backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MoreLikeThisSettings {
    /// Ignore terms found in fewer documents than this.
    pub min_doc_freq: u32,
    /// Maximum number of terms selected from the source text.
    pub max_query_terms: u32,
    /// Ignore terms occurring fewer times than this in the source text.
    pub min_term_freq: u32,
    /// Fraction of selected terms a candidate must match.
    pub percent_terms_to_match: f64,
    /// Ignore words shorter than this (0 = no limit).
    pub min_word_len: u32,
    /// Ignore words longer than this (0 = no limit).
    pub max_word_len: u32,
}

impl Default for MoreLikeThisSettings {
    fn default() -> Self {
        Self {
            min_doc_freq: 2,
            max_query_terms: 25,
            min_term_freq: 2,
            percent_terms_to_match: 0.3,
            min_word_len: 0,
            max_word_len: 0,
        }
    }
}

/// Backend concurrency gate settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Name of the pool, used in log output.
    pub name: String,
    /// Maximum simultaneous backend calls.
    pub max_concurrent: usize,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            name: String::from("CirrusSearch-Search"),
            max_concurrent: 10,
            timeout_ms: 20_000,
        }
    }
}

impl PoolSettings {
    /// Returns the per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.index.base_name, "wiki");
        assert_eq!(config.index.content_namespaces, vec![0]);
        assert!((config.search.title_weight - 20.0).abs() < f64::EPSILON);
        assert!((config.search.redirect_weight - 15.0).abs() < f64::EPSILON);
        assert!((config.search.heading_weight - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.search.phrase_slop, 1);
        assert_eq!(config.search.max_prefix_length, 255);
        assert!(config.rescore.enabled());
        assert_eq!(config.rescore.window_size, 1024);
        assert_eq!(config.suggest.size, 1);
        assert_eq!(config.snippet.context_lines, 2);
        assert_eq!(config.snippet.context_chars, 75);
        assert_eq!(config.more_like_this.max_query_terms, 25);
        assert!(config.boost_templates.is_empty());
        assert_eq!(config.pool.name, "CirrusSearch-Search");
        assert_eq!(config.pool.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_rescore_disabled_at_one() {
        let rescore = RescoreSettings {
            phrase_boost: 1.0,
            ..RescoreSettings::default()
        };
        assert!(!rescore.enabled());
    }

    #[test]
    fn test_content_namespace() {
        let index = IndexSettings::default();
        assert!(index.is_content_namespace(0));
        assert!(!index.is_content_namespace(1));
    }

    #[test]
    fn test_to_toml_round_trip() {
        let mut config = Config::default();
        config
            .boost_templates
            .insert("Template:Featured".into(), 2.0);
        let toml = config.to_toml().unwrap();

        assert!(toml.contains("[index]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[pool]"));
        assert!(toml.contains("base_name = \"wiki\""));

        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }
}
