//! Per-request parameters for a [`Searcher`](super::Searcher).

use cirrus_config::SnippetSettings;

use crate::request::Highlight;

/// Stored fields returned for title-only results.
const TITLE_FIELDS: &[&str] = &["namespace", "title"];

/// Stored fields returned for full-text results.
const FULL_TEXT_FIELDS: &[&str] = &[
    "namespace",
    "title",
    "redirect",
    "text",
    "text_bytes",
    "text_words",
];

/// Which result shape to build from the backend's hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultShape {
    /// Namespace and title only, without highlighting.
    TitleOnly,
    /// Title, redirect, section and text snippets with highlighting.
    #[default]
    FullText,
}

impl ResultShape {
    /// Returns the stored fields the backend should return.
    pub fn source_fields(self) -> Vec<String> {
        let fields = match self {
            Self::TitleOnly => TITLE_FIELDS,
            Self::FullText => FULL_TEXT_FIELDS,
        };
        fields.iter().map(|field| (*field).to_string()).collect()
    }

    /// Returns the highlight block for this shape, if any.
    pub fn highlight(self, snippet: &SnippetSettings) -> Option<Highlight> {
        match self {
            Self::TitleOnly => None,
            Self::FullText => Some(Highlight::full_text(snippet)),
        }
    }
}

/// Paging and namespace restriction for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Offset of the first result. Zero is not sent.
    pub offset: usize,
    /// Number of results. Zero leaves the backend default.
    pub limit: usize,
    /// Namespaces to search. Empty searches all.
    pub namespaces: Vec<i32>,
    /// Result shape.
    pub shape: ResultShape,
}

impl SearchParams {
    /// Creates parameters for a page of results.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    /// Restricts the search to `namespaces`.
    pub fn with_namespaces(mut self, namespaces: Vec<i32>) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Sets the result shape.
    pub fn with_shape(mut self, shape: ResultShape) -> Self {
        self.shape = shape;
        self
    }
}
