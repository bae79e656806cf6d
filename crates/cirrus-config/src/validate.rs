//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for settings that are accepted but
//! probably not what the operator intended.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// Phrase rescoring is switched off by a boost of 1.0 or less.
    RescoreDisabled {
        /// Configured boost.
        phrase_boost: f64,
    },
    /// The concurrency gate admits no calls; it will be clamped to one.
    ZeroConcurrency,
    /// Backend calls time out immediately.
    ZeroTimeout,
    /// A configured template boost cannot raise a score.
    NonPositiveTemplateWeight {
        /// Template name.
        template: String,
        /// Configured weight.
        weight: f64,
    },
    /// No namespace is routed to the content partition.
    NoContentNamespaces,
    /// The prefix length limit rejects every prefix search.
    ZeroPrefixLength,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RescoreDisabled { phrase_boost } => {
                write!(f, "phrase rescoring disabled (phrase_boost = {phrase_boost})")
            }
            Self::ZeroConcurrency => {
                write!(f, "pool max_concurrent is 0, using 1")
            }
            Self::ZeroTimeout => write!(f, "pool timeout_ms is 0, every call will time out"),
            Self::NonPositiveTemplateWeight { template, weight } => {
                write!(f, "boost for template '{template}' is not positive: {weight}")
            }
            Self::NoContentNamespaces => {
                write!(f, "no content namespaces are configured")
            }
            Self::ZeroPrefixLength => {
                write!(f, "search max_prefix_length is 0, prefix search always fails")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if !config.rescore.enabled() {
        warnings.push(ConfigWarning::RescoreDisabled {
            phrase_boost: config.rescore.phrase_boost,
        });
    }
    if config.pool.max_concurrent == 0 {
        warnings.push(ConfigWarning::ZeroConcurrency);
    }
    if config.pool.timeout_ms == 0 {
        warnings.push(ConfigWarning::ZeroTimeout);
    }
    if config.index.content_namespaces.is_empty() {
        warnings.push(ConfigWarning::NoContentNamespaces);
    }
    if config.search.max_prefix_length == 0 {
        warnings.push(ConfigWarning::ZeroPrefixLength);
    }

    warnings.extend(
        config
            .boost_templates
            .iter()
            .filter(|(_, weight)| **weight <= 0.0 || weight.is_nan())
            .map(|(template, weight)| ConfigWarning::NonPositiveTemplateWeight {
                template: template.clone(),
                weight: *weight,
            }),
    );

    warnings
}
