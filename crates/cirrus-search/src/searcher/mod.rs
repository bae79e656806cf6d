//! Search request building and execution.
//!
//! A [`SearchClient`] holds what every request shares: the backend, the concurrency gate,
//! the configuration and the keyword registry. Each request gets its own [`Searcher`], which
//! owns a fresh [`SearchContext`] and is consumed by the search it runs.
//!
//! # Operations
//!
//! 1. **Prefix search**: a lower-cased match on the prefix-indexed title field. Terms longer
//!    than the indexed prefix length are rejected before any backend call.
//!
//! 2. **Full-text search**: keyword clauses are applied to the context, the remaining text is
//!    escaped into a `query_string` over the weighted title, heading, text and (optionally)
//!    redirect fields. Plain word queries get a second-pass phrase rescore, and the residual
//!    text is sent to the phrase suggester.
//!
//! 3. **More like this**: fetches the source document's text, then searches for similar
//!    documents while excluding the source itself.
//!
//! All three finish in the shared search step: filters are merged, link and template boosts
//! are applied, paging and highlighting are set, and the request is routed to an index
//! partition. Backend failures are logged and returned as a [`SearchStatus`] warning rather
//! than an error.

mod execute;
mod params;
mod query;

use std::sync::Arc;

use cirrus_config::Config;
pub use params::{ResultShape, SearchParams};
use tracing::warn;

use crate::{
    backend::SearchBackend, context::SearchContext, error::BackendError,
    keyword::KeywordRegistry, pool::ConcurrencyGate, result::ResultSet,
};

/// Message key of the warning returned when the backend fails.
pub const BACKEND_ERROR_KEY: &str = "cirrussearch-backend-error";

/// Result of a search that reached the backend step.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The backend answered.
    Results(ResultSet),
    /// The backend failed. There are no results, but the request did not crash.
    Warning(SearchStatus),
}

impl SearchOutcome {
    /// Returns the result set, if the backend answered.
    pub fn results(&self) -> Option<&ResultSet> {
        match self {
            Self::Results(results) => Some(results),
            Self::Warning(_) => None,
        }
    }

    /// Returns true for a warning status.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    /// Logs a backend failure and turns it into a warning.
    fn backend_failure(description: &str, err: &BackendError) -> Self {
        warn!(description, error = %err, "search backend request failed");
        Self::Warning(SearchStatus::backend_failure(description, err))
    }
}

/// A non-fatal failure reported in place of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStatus {
    /// Stable message key.
    pub message_key: &'static str,
    /// Human-readable description of the failed operation.
    pub description: String,
    /// Underlying error text.
    pub detail: String,
}

impl SearchStatus {
    /// Creates the warning for a backend failure during `description`.
    pub fn backend_failure(description: impl Into<String>, err: &BackendError) -> Self {
        Self {
            message_key: BACKEND_ERROR_KEY,
            description: description.into(),
            detail: err.to_string(),
        }
    }
}

/// Shared, long-lived search entry point.
///
/// Cloning is cheap; every clone shares the same backend and concurrency gate.
#[derive(Clone)]
pub struct SearchClient {
    /// Backend transport.
    backend: Arc<dyn SearchBackend>,
    /// Limit on simultaneous backend calls.
    gate: Arc<ConcurrencyGate>,
    /// Resolved configuration.
    config: Arc<Config>,
    /// Recognised keyword features.
    keywords: Arc<KeywordRegistry>,
}

impl SearchClient {
    /// Creates a client with the default keyword features and a gate built from the pool
    /// settings.
    pub fn new(backend: Arc<dyn SearchBackend>, config: Config) -> Self {
        Self {
            backend,
            gate: Arc::new(ConcurrencyGate::from_settings(&config.pool)),
            config: Arc::new(config),
            keywords: Arc::new(KeywordRegistry::default()),
        }
    }

    /// Replaces the keyword registry.
    pub fn with_keywords(mut self, keywords: KeywordRegistry) -> Self {
        self.keywords = Arc::new(keywords);
        self
    }

    /// Replaces the concurrency gate.
    pub fn with_gate(mut self, gate: ConcurrencyGate) -> Self {
        self.gate = Arc::new(gate);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the concurrency gate.
    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// Creates a single-use searcher for one request.
    pub fn searcher(&self, params: SearchParams) -> Searcher {
        Searcher {
            backend: Arc::clone(&self.backend),
            gate: Arc::clone(&self.gate),
            config: Arc::clone(&self.config),
            keywords: Arc::clone(&self.keywords),
            params,
            context: SearchContext::new(),
        }
    }
}

/// Builds and runs exactly one search.
///
/// Operations take `self` by value, so a searcher cannot be reused once it has searched.
#[allow(clippy::multiple_inherent_impl)]
pub struct Searcher {
    /// Backend transport.
    backend: Arc<dyn SearchBackend>,
    /// Limit on simultaneous backend calls.
    gate: Arc<ConcurrencyGate>,
    /// Resolved configuration.
    config: Arc<Config>,
    /// Recognised keyword features.
    keywords: Arc<KeywordRegistry>,
    /// Paging, namespaces and result shape.
    params: SearchParams,
    /// State accumulated while building the request.
    context: SearchContext,
}

#[allow(clippy::multiple_inherent_impl)]
impl Searcher {
    /// Returns the request parameters.
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Returns the context accumulated so far.
    pub fn context(&self) -> &SearchContext {
        &self.context
    }
}
