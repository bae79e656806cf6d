//! Search backend interface and response model.
//!
//! The backend is an external Elasticsearch-style engine. This crate only builds requests and
//! interprets responses; transport lives behind the [`SearchBackend`] trait so callers can
//! plug in an HTTP client, and tests can plug in an in-memory fake.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::{error::BackendError, request::SearchRequest};

/// Which index partition a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    /// Both partitions.
    All,
    /// Content namespaces only.
    Content,
    /// Non-content namespaces only.
    General,
}

impl IndexTarget {
    /// Returns the index name for this partition.
    pub fn index_name(self, base: &str) -> String {
        match self {
            Self::All => base.to_string(),
            Self::Content => format!("{base}_content"),
            Self::General => format!("{base}_general"),
        }
    }
}

/// Transport to a search backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Runs a search request.
    async fn search(
        &self,
        target: IndexTarget,
        request: SearchRequest,
    ) -> Result<SearchResponse, BackendError>;

    /// Fetches stored fields of a single document. `Ok(None)` means the id does not exist.
    async fn get(
        &self,
        target: IndexTarget,
        id: u64,
        fields: Vec<String>,
    ) -> Result<Option<HitSource>, BackendError>;
}

/// Outcome of fetching a single document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentLookup {
    /// The document exists.
    Found(HitSource),
    /// No document has this id.
    NotFound,
    /// The backend failed.
    Failed(BackendError),
}

impl From<Result<Option<HitSource>, BackendError>> for DocumentLookup {
    fn from(result: Result<Option<HitSource>, BackendError>) -> Self {
        match result {
            Ok(Some(source)) => Self::Found(source),
            Ok(None) => Self::NotFound,
            Err(err) => Self::Failed(err),
        }
    }
}

/// A search response body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    /// Matching documents.
    #[serde(default)]
    pub hits: Hits,
    /// Suggestions keyed by generator name.
    #[serde(default)]
    pub suggest: BTreeMap<String, Vec<SuggestEntry>>,
}

impl SearchResponse {
    /// Decodes a response from JSON.
    pub fn from_json(value: Value) -> Result<Self, BackendError> {
        serde_json::from_value(value).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

/// The hits section of a response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Hits {
    /// Total number of matching documents.
    #[serde(default)]
    pub total: TotalHits,
    /// Returned documents.
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Total hit count, either a bare number or an object with a `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    /// Bare count.
    Count(u64),
    /// Count object.
    Object {
        /// The count.
        value: u64,
    },
}

impl Default for TotalHits {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl TotalHits {
    /// Returns the count.
    pub fn value(self) -> u64 {
        match self {
            Self::Count(value) | Self::Object { value } => value,
        }
    }
}

/// A matching document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Hit {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Relevance score.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    /// Stored fields.
    #[serde(rename = "_source", default)]
    pub source: HitSource,
    /// Highlighted fragments keyed by field.
    #[serde(default)]
    pub highlight: BTreeMap<String, Vec<String>>,
}

/// Stored fields of a page document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HitSource {
    /// Namespace number.
    pub namespace: i32,
    /// Title without namespace prefix.
    pub title: String,
    /// Redirects pointing at this page.
    pub redirect: Vec<RedirectSource>,
    /// Plain body text.
    pub text: String,
    /// Body size in bytes.
    pub text_bytes: Option<u64>,
    /// Body size in words.
    pub text_words: Option<u64>,
}

/// A redirect pointing at a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RedirectSource {
    /// Namespace of the redirect page.
    pub namespace: i32,
    /// Title of the redirect page.
    pub title: String,
}

/// Suggestions for one input text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SuggestEntry {
    /// Text that was corrected.
    #[serde(default)]
    pub text: String,
    /// Candidate corrections, best first.
    #[serde(default)]
    pub options: Vec<SuggestOption>,
}

/// A candidate correction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SuggestOption {
    /// Corrected text.
    pub text: String,
    /// Corrected text with changed words wrapped in suggestion markers.
    #[serde(default)]
    pub highlighted: Option<String>,
    /// Suggestion score.
    #[serde(default)]
    pub score: f64,
}
