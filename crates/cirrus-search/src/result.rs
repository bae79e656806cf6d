//! Result types and the transformation from backend responses.
//!
//! Two result shapes are produced:
//! - [`TitleResult`]: namespace and title only
//! - [`FullTextResult`]: title, redirect, section and text snippets with highlighting
//!
//! For full-text results, a highlighted title wins over a highlighted redirect. The backend
//! sometimes returns no text highlight at all, so the text snippet falls back to the start of
//! the page text.

use cirrus_config::SnippetSettings;

use crate::{
    backend::{Hit, SearchResponse, SuggestEntry, SuggestOption},
    context::{CrossSearchStrategy, SearchContext},
    highlight::{
        escape_highlighted_text, escape_html, escape_suggestion, find_redirect_title,
        highlight_none, section_anchor, strip_highlighting,
    },
    request::{REDIRECT_SUGGESTION, TITLE_SUGGESTION},
    searcher::ResultShape,
};

/// Highlighted field names in the backend response.
mod field {
    /// Page title.
    pub const TITLE: &str = "title";
    /// Redirect titles.
    pub const REDIRECT: &str = "redirect.title";
    /// Section headings.
    pub const HEADING: &str = "heading";
    /// Body text.
    pub const TEXT: &str = "text";
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Total number of matching documents.
    pub total_hits: u64,
    /// Results in backend order.
    pub results: Vec<SearchResult>,
    /// Spelling suggestion, if the backend offered one.
    pub suggestion: Option<Suggestion>,
    /// Whether the query that produced these results can run on other wikis.
    pub cross_search_strategy: CrossSearchStrategy,
}

impl ResultSet {
    /// Builds a result set from a backend response.
    pub fn from_response(
        response: SearchResponse,
        shape: ResultShape,
        ctx: &SearchContext,
        snippet: &SnippetSettings,
    ) -> Self {
        let results = response
            .hits
            .hits
            .into_iter()
            .map(|hit| match shape {
                ResultShape::TitleOnly => SearchResult::Title(TitleResult::from_hit(hit)),
                ResultShape::FullText => {
                    SearchResult::FullText(FullTextResult::from_hit(hit, snippet))
                }
            })
            .collect();

        let suggestion = [TITLE_SUGGESTION, REDIRECT_SUGGESTION]
            .iter()
            .find_map(|name| best_option(response.suggest.get(*name)?))
            .map(|option| Suggestion::from_option(option, ctx));

        Self {
            total_hits: response.hits.total.value(),
            results,
            suggestion,
            cross_search_strategy: ctx.cross_search_strategy,
        }
    }

    /// Returns the number of results in this page.
    pub fn returned_hits(&self) -> usize {
        self.results.len()
    }

    /// Returns true if this page has no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Returns the first option of the first entry.
fn best_option(entries: &[SuggestEntry]) -> Option<&SuggestOption> {
    entries.first()?.options.first()
}

/// A single search result.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    /// Title-only shape.
    Title(TitleResult),
    /// Full-text shape.
    FullText(FullTextResult),
}

impl SearchResult {
    /// Returns the page namespace.
    pub fn namespace(&self) -> i32 {
        match self {
            Self::Title(result) => result.namespace,
            Self::FullText(result) => result.namespace,
        }
    }

    /// Returns the page title.
    pub fn title(&self) -> &str {
        match self {
            Self::Title(result) => &result.title,
            Self::FullText(result) => &result.title,
        }
    }

    /// Returns the full-text result, if this is one.
    pub fn as_full_text(&self) -> Option<&FullTextResult> {
        match self {
            Self::FullText(result) => Some(result),
            Self::Title(_) => None,
        }
    }
}

/// Namespace and title of a matching page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleResult {
    /// Namespace number.
    pub namespace: i32,
    /// Title without namespace prefix.
    pub title: String,
}

impl TitleResult {
    /// Extracts the title from a hit.
    fn from_hit(hit: Hit) -> Self {
        Self {
            namespace: hit.source.namespace,
            title: hit.source.title,
        }
    }
}

/// A matching page with highlighted snippets.
///
/// Snippets are HTML-escaped with highlight markers intact.
#[derive(Debug, Clone, PartialEq)]
pub struct FullTextResult {
    /// Document id.
    pub id: String,
    /// Namespace number.
    pub namespace: i32,
    /// Title without namespace prefix.
    pub title: String,
    /// Relevance score.
    pub score: Option<f64>,
    /// Highlighted title, when the title matched.
    pub title_snippet: Option<String>,
    /// Title of the matching redirect, when a redirect matched instead of the title.
    pub redirect_title: Option<String>,
    /// Namespace of the matching redirect.
    pub redirect_namespace: Option<i32>,
    /// Highlighted redirect title.
    pub redirect_snippet: Option<String>,
    /// Plain text of the matching section heading.
    pub section_title: Option<String>,
    /// Anchor of the matching section.
    pub section_anchor: Option<String>,
    /// Highlighted section heading.
    pub section_snippet: Option<String>,
    /// Highlighted body text, or the start of the body when nothing was highlighted.
    pub text_snippet: String,
    /// Body size in words.
    pub word_count: Option<u64>,
    /// Body size in bytes.
    pub byte_size: Option<u64>,
}

impl FullTextResult {
    /// Builds a full-text result from a hit.
    fn from_hit(hit: Hit, snippet: &SnippetSettings) -> Self {
        let first = |name: &str| {
            hit.highlight
                .get(name)
                .and_then(|fragments| fragments.first())
        };

        let title_snippet = first(field::TITLE).map(|text| escape_highlighted_text(text));

        let mut redirect = None;
        if title_snippet.is_none()
            && let Some(highlighted) = first(field::REDIRECT)
            && let Some(found) = find_redirect_title(highlighted, &hit.source.redirect)
        {
            redirect = Some((found.clone(), escape_highlighted_text(highlighted)));
        }

        let section = first(field::HEADING).map(|highlighted| {
            let plain = strip_highlighting(highlighted);
            let anchor = section_anchor(&plain);
            (plain, anchor, escape_highlighted_text(highlighted))
        });

        let text_snippet = first(field::TEXT).map_or_else(
            || {
                highlight_none(
                    &hit.source.text,
                    snippet.context_lines,
                    snippet.context_chars,
                )
            },
            |text| escape_highlighted_text(text),
        );

        let (redirect_title, redirect_namespace, redirect_snippet) = match redirect {
            Some((source, escaped)) => (Some(source.title), Some(source.namespace), Some(escaped)),
            None => (None, None, None),
        };
        let (section_title, section_anchor, section_snippet) = match section {
            Some((title, anchor, escaped)) => (Some(title), Some(anchor), Some(escaped)),
            None => (None, None, None),
        };

        Self {
            id: hit.id,
            namespace: hit.source.namespace,
            title: hit.source.title,
            score: hit.score,
            title_snippet,
            redirect_title,
            redirect_namespace,
            redirect_snippet,
            section_title,
            section_anchor,
            section_snippet,
            text_snippet,
            word_count: hit.source.text_words,
            byte_size: hit.source.text_bytes,
        }
    }
}

/// A spelling suggestion for the whole query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Suggested query, with keyword clauses re-attached.
    pub query: String,
    /// HTML-escaped suggested query with corrected words marked.
    pub snippet: String,
}

impl Suggestion {
    /// Builds a suggestion from the best backend option.
    ///
    /// Keyword text stripped before suggesting is put back around the corrected text.
    fn from_option(option: &SuggestOption, ctx: &SearchContext) -> Self {
        let highlighted = option.highlighted.as_deref().unwrap_or(&option.text);

        let mut query = Vec::new();
        let mut snippet = Vec::new();
        for prefix in &ctx.suggest_prefixes {
            query.push(prefix.clone());
            snippet.push(escape_html(prefix));
        }
        query.push(option.text.clone());
        snippet.push(escape_suggestion(highlighted));
        for suffix in &ctx.suggest_suffixes {
            query.push(suffix.clone());
            snippet.push(escape_html(suffix));
        }

        Self {
            query: query.join(" "),
            snippet: snippet.join(" "),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: serde_json::Value) -> SearchResponse {
        SearchResponse::from_json(value).unwrap()
    }

    fn full_text(value: serde_json::Value) -> FullTextResult {
        let set = ResultSet::from_response(
            response(value),
            ResultShape::FullText,
            &SearchContext::new(),
            &SnippetSettings::default(),
        );
        set.results[0].as_full_text().unwrap().clone()
    }

    #[test]
    fn title_only_shape() {
        let set = ResultSet::from_response(
            response(json!({"hits": {"total": 3, "hits": [
                {"_id": "1", "_source": {"namespace": 0, "title": "Alpha"}},
                {"_id": "2", "_source": {"namespace": 4, "title": "Beta"}},
            ]}})),
            ResultShape::TitleOnly,
            &SearchContext::new(),
            &SnippetSettings::default(),
        );
        assert_eq!(set.total_hits, 3);
        assert_eq!(set.returned_hits(), 2);
        assert_eq!(
            set.results[1],
            SearchResult::Title(TitleResult {
                namespace: 4,
                title: "Beta".into(),
            })
        );
        assert!(set.suggestion.is_none());
    }

    #[test]
    fn title_highlight_beats_redirect() {
        let result = full_text(json!({"hits": {"hits": [{
            "_id": "1",
            "_source": {"title": "Cat", "redirect": [{"namespace": 0, "title": "Kitty"}]},
            "highlight": {
                "title": ["<span class=\"searchmatch\">Cat</span>"],
                "redirect.title": ["<span class=\"searchmatch\">Kitty</span>"],
            }
        }]}}));
        assert_eq!(
            result.title_snippet.as_deref(),
            Some("<span class=\"searchmatch\">Cat</span>")
        );
        assert!(result.redirect_title.is_none());
    }

    #[test]
    fn redirect_used_without_title_match() {
        let result = full_text(json!({"hits": {"hits": [{
            "_id": "1",
            "_source": {"title": "Cat", "redirect": [
                {"namespace": 1, "title": "Kitty"},
                {"namespace": 0, "title": "Kitty"},
            ]},
            "highlight": {"redirect.title": ["<span class=\"searchmatch\">Kitty</span>"]}
        }]}}));
        assert!(result.title_snippet.is_none());
        assert_eq!(result.redirect_title.as_deref(), Some("Kitty"));
        assert_eq!(result.redirect_namespace, Some(0));
    }

    #[test]
    fn unmatched_redirect_is_dropped() {
        let result = full_text(json!({"hits": {"hits": [{
            "_id": "1",
            "_source": {"title": "Cat", "redirect": []},
            "highlight": {"redirect.title": ["Ghost"]}
        }]}}));
        assert!(result.redirect_title.is_none());
        assert!(result.redirect_snippet.is_none());
    }

    #[test]
    fn text_falls_back_to_page_start() {
        let result = full_text(json!({"hits": {"hits": [{
            "_id": "7",
            "_score": 1.5,
            "_source": {"title": "Cat", "text": "Cats <purr>.\nThey sleep.\nA lot.", "text_words": 6}
        }]}}));
        assert_eq!(result.text_snippet, "Cats &lt;purr&gt;.\nThey sleep.");
        assert_eq!(result.word_count, Some(6));
        assert_eq!(result.score, Some(1.5));
    }

    #[test]
    fn section_from_heading() {
        let result = full_text(json!({"hits": {"hits": [{
            "_id": "1",
            "_source": {"title": "Cat"},
            "highlight": {
                "heading": ["Early <span class=\"searchmatch\">life</span>"],
                "text": ["a <b>"],
            }
        }]}}));
        assert_eq!(result.section_title.as_deref(), Some("Early life"));
        assert_eq!(result.section_anchor.as_deref(), Some("Early_life"));
        assert_eq!(result.text_snippet, "a &lt;b&gt;");
    }

    #[test]
    fn suggestion_prefers_title_and_reattaches_keywords() {
        let mut ctx = SearchContext::new();
        ctx.add_suggest_prefix("incategory:Foo");
        ctx.add_suggest_suffix("prefix:Ba");
        let set = ResultSet::from_response(
            response(json!({
                "hits": {"hits": []},
                "suggest": {
                    "suggest": [{"text": "helo", "options": [
                        {"text": "hello", "highlighted": "<em>hello</em>", "score": 0.5}
                    ]}],
                    "suggest-redirect": [{"text": "helo", "options": [
                        {"text": "halo", "score": 0.9}
                    ]}]
                }
            })),
            ResultShape::FullText,
            &ctx,
            &SnippetSettings::default(),
        );
        let suggestion = set.suggestion.unwrap();
        assert_eq!(suggestion.query, "incategory:Foo hello prefix:Ba");
        assert_eq!(suggestion.snippet, "incategory:Foo <em>hello</em> prefix:Ba");
    }

    #[test]
    fn suggestion_falls_back_to_redirect() {
        let set = ResultSet::from_response(
            response(json!({
                "hits": {"hits": []},
                "suggest": {
                    "suggest": [{"text": "helo", "options": []}],
                    "suggest-redirect": [{"text": "helo", "options": [{"text": "halo"}]}]
                }
            })),
            ResultShape::FullText,
            &SearchContext::new(),
            &SnippetSettings::default(),
        );
        assert_eq!(set.suggestion.unwrap().query, "halo");
    }
}
