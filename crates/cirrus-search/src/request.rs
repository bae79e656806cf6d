//! Outbound search request model.
//!
//! A [`SearchRequest`] is built once per search and moved into the backend call. It
//! serializes to the backend's JSON request body; the search type travels separately as a
//! request parameter.

use std::collections::BTreeMap;

use cirrus_config::{RescoreSettings, SnippetSettings, SuggestSettings};
use serde::Serialize;
use serde_json::Value;

/// Marker placed before highlighted text in snippets.
pub const HIGHLIGHT_PRE: &str = "<span class=\"searchmatch\">";
/// Marker placed after highlighted text in snippets.
pub const HIGHLIGHT_POST: &str = "</span>";
/// Marker placed before corrected words in suggestions.
pub const SUGGEST_PRE: &str = "<em>";
/// Marker placed after corrected words in suggestions.
pub const SUGGEST_POST: &str = "</em>";

/// Name of the title-based suggestion generator.
pub const TITLE_SUGGESTION: &str = "suggest";
/// Name of the redirect-based suggestion generator.
pub const REDIRECT_SUGGESTION: &str = "suggest-redirect";

/// How the backend computes term statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Per-shard statistics.
    QueryThenFetch,
    /// Distributed statistics, slower but more accurate.
    DfsQueryThenFetch,
}

impl SearchType {
    /// Returns the backend parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QueryThenFetch => "query_then_fetch",
            Self::DfsQueryThenFetch => "dfs_query_then_fetch",
        }
    }
}

/// A complete search request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    /// The query, with filters and scoring functions already applied.
    pub query: Value,
    /// Offset of the first result. Omitted when zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,
    /// Number of results. Omitted when zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Stored fields to return.
    #[serde(rename = "_source")]
    pub source: Vec<String>,
    /// Highlighting, for full-text result shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    /// Second-pass phrase rescore.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rescore: Option<Rescore>,
    /// Spelling suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggest: Option<Suggest>,
    /// Search type hint, sent as a request parameter.
    #[serde(skip)]
    pub search_type: Option<SearchType>,
}

impl SearchRequest {
    /// Creates a request for `query` with no extras.
    pub fn new(query: Value) -> Self {
        Self {
            query,
            from: None,
            size: None,
            source: Vec::new(),
            highlight: None,
            rescore: None,
            suggest: None,
            search_type: None,
        }
    }

    /// Returns the request body as JSON.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Second-pass rescoring of the top results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rescore {
    /// Results rescored per shard.
    pub window_size: usize,
    /// Rescore query and weights.
    pub query: RescoreQuery,
}

/// Rescore query and weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RescoreQuery {
    /// Query run over the window.
    pub rescore_query: Value,
    /// Weight of the original score.
    pub query_weight: f64,
    /// Weight of the rescore query score.
    pub rescore_query_weight: f64,
}

impl Rescore {
    /// Creates a phrase rescore using the configured window and boost.
    pub fn phrase(rescore_query: Value, settings: &RescoreSettings) -> Self {
        Self {
            window_size: settings.window_size,
            query: RescoreQuery {
                rescore_query,
                query_weight: 1.0,
                rescore_query_weight: settings.phrase_boost,
            },
        }
    }
}

/// Spelling suggestion block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggest {
    /// Text to correct.
    pub text: String,
    /// Generators keyed by suggestion name.
    #[serde(flatten)]
    pub generators: BTreeMap<String, SuggestGenerator>,
}

impl Suggest {
    /// Creates suggestions on the title, and on redirect titles when requested.
    pub fn for_titles(
        text: impl Into<String>,
        include_redirects: bool,
        settings: &SuggestSettings,
    ) -> Self {
        let mut generators = BTreeMap::new();
        generators.insert(
            TITLE_SUGGESTION.to_string(),
            SuggestGenerator::phrase("title.suggest", settings),
        );
        if include_redirects {
            generators.insert(
                REDIRECT_SUGGESTION.to_string(),
                SuggestGenerator::phrase("redirect.title.suggest", settings),
            );
        }
        Self {
            text: text.into(),
            generators,
        }
    }
}

/// One named suggestion generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestGenerator {
    /// Phrase suggester settings.
    pub phrase: PhraseSuggester,
}

impl SuggestGenerator {
    /// Creates a phrase suggester on `field`.
    pub fn phrase(field: &str, settings: &SuggestSettings) -> Self {
        Self {
            phrase: PhraseSuggester {
                field: field.to_string(),
                size: settings.size,
                max_errors: settings.max_errors,
                confidence: settings.confidence,
                direct_generator: vec![DirectGenerator {
                    field: field.to_string(),
                    suggest_mode: "always".to_string(),
                    max_term_freq: settings.max_term_freq,
                    min_word_len: settings.min_word_length,
                }],
                highlight: SuggestHighlight {
                    pre_tag: SUGGEST_PRE.to_string(),
                    post_tag: SUGGEST_POST.to_string(),
                },
            },
        }
    }
}

/// Phrase suggester settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseSuggester {
    /// Field to draw corrections from.
    pub field: String,
    /// Suggestions returned.
    pub size: usize,
    /// Maximum corrected terms.
    pub max_errors: f64,
    /// Minimum score ratio over the original text.
    pub confidence: f64,
    /// Candidate generators.
    pub direct_generator: Vec<DirectGenerator>,
    /// Markers around corrected words.
    pub highlight: SuggestHighlight,
}

/// Candidate term generator for a phrase suggester.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectGenerator {
    /// Field to draw candidates from.
    pub field: String,
    /// When to generate candidates.
    pub suggest_mode: String,
    /// Terms more frequent than this are not corrected.
    pub max_term_freq: f64,
    /// Shortest corrected term.
    pub min_word_len: usize,
}

/// Markers around corrected words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestHighlight {
    /// Opening marker.
    pub pre_tag: String,
    /// Closing marker.
    pub post_tag: String,
}

/// Highlighting block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    /// Fragment ordering.
    pub order: String,
    /// Opening markers.
    pub pre_tags: Vec<String>,
    /// Closing markers.
    pub post_tags: Vec<String>,
    /// Per-field settings.
    pub fields: BTreeMap<String, HighlightField>,
}

impl Highlight {
    /// Highlighting for full-text results: title, redirects, headings and body text.
    pub fn full_text(snippet: &SnippetSettings) -> Self {
        let whole = HighlightField {
            kind: None,
            number_of_fragments: 1,
            fragment_size: Some(10_000),
        };
        let fields = BTreeMap::from([
            (
                "title".to_string(),
                HighlightField {
                    kind: Some("fvh".to_string()),
                    number_of_fragments: 0,
                    fragment_size: None,
                },
            ),
            (
                "text".to_string(),
                HighlightField {
                    kind: None,
                    number_of_fragments: 1,
                    fragment_size: Some(snippet.text_fragment_size),
                },
            ),
            ("redirect.title".to_string(), whole.clone()),
            ("heading".to_string(), whole),
        ]);

        Self {
            order: "score".to_string(),
            pre_tags: vec![HIGHLIGHT_PRE.to_string()],
            post_tags: vec![HIGHLIGHT_POST.to_string()],
            fields,
        }
    }
}

/// Highlight settings for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightField {
    /// Highlighter implementation.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Fragments returned. Zero returns the whole field.
    pub number_of_fragments: usize,
    /// Fragment length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_size: Option<usize>,
}
