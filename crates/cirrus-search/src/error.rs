//! Error types for the cirrus-search crate.

use std::time::Duration;

use thiserror::Error;

/// Failures reported to the caller before any backend work is attempted.
///
/// Backend failures are not represented here: they are logged and turned into a
/// [`SearchStatus`](crate::SearchStatus) warning instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The prefix search term is longer than the indexed prefix length.
    #[error("prefix search request is too long: {length} characters, maximum is {max}")]
    RequestTooLong {
        /// Length of the rejected term, in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },
}

impl SearchError {
    /// Returns the stable message key for this error.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::RequestTooLong { .. } => "cirrussearch-request-too-long",
        }
    }

    /// Returns the HTTP status code an API layer should report.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::RequestTooLong { .. } => 400,
        }
    }
}

/// Failures while talking to the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend could not be reached or returned an error.
    #[error("search backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with something that could not be decoded.
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    /// The call did not finish within the pool timeout.
    #[error("backend call in pool '{pool}' timed out after {timeout:?}")]
    Timeout {
        /// Pool name.
        pool: String,
        /// Configured timeout.
        timeout: Duration,
    },

    /// The concurrency gate was shut down.
    #[error("pool '{0}' is closed")]
    PoolClosed(String),

    /// The task running the call panicked or was cancelled.
    #[error("backend task failed: {0}")]
    TaskFailed(String),
}
