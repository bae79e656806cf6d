//! The three search operations and the query pieces they build.

use std::sync::Arc;

use cirrus_query::{QueryNode, escape_phrase, parse_with_keywords};
use tracing::debug;

use super::{SearchOutcome, Searcher, execute::RequestExtras};
use crate::{
    backend::{DocumentLookup, IndexTarget},
    dsl,
    error::SearchError,
    markup::strip_markup,
    request::{Rescore, Suggest},
};

/// Stored field holding the plain page text.
const TEXT_FIELD: &str = "text";

#[allow(clippy::multiple_inherent_impl)]
impl Searcher {
    /// Finds titles starting with `term`.
    ///
    /// Fails with [`SearchError::RequestTooLong`] when `term` is longer than the indexed
    /// prefix length, counted in characters.
    pub async fn prefix_search(self, term: &str) -> Result<SearchOutcome, SearchError> {
        let max = self.config.search.max_prefix_length;
        let length = term.chars().count();
        if length > max {
            return Err(SearchError::RequestTooLong { length, max });
        }

        let description = format!("prefix search for '{term}'");
        let query = dsl::title_prefix(term);
        Ok(self.search(query, RequestExtras::default(), description).await)
    }

    /// Runs a full-text search for `term`.
    ///
    /// Keyword clauses become filters and boosts; the remaining text is escaped and searched
    /// over the weighted fields. Redirect titles are searched and suggested on only when
    /// `include_redirects` is set.
    pub async fn search_text(mut self, term: &str, include_redirects: bool) -> SearchOutcome {
        let description = format!("full text search for '{term}'");
        let parsed = parse_with_keywords(term, self.keywords.as_ref());
        if let Some(node) = &parsed {
            self.keywords.apply_all(&mut self.context, node, term);
        }

        let mut clauses = Vec::new();
        if let Some(node) = &parsed {
            let residual = node.to_query_string();
            if !residual.is_empty() {
                clauses.push(residual);
            }
        }
        clauses.extend(self.context.query_fragments.iter().cloned());

        let fields = self.full_text_fields(include_redirects);
        let query = if clauses.is_empty() {
            dsl::match_all()
        } else {
            dsl::query_string(&clauses.join(" "), &fields, self.config.search.phrase_slop)
        };

        let mut extras = RequestExtras::default();
        if let Some(node) = &parsed {
            extras.rescore = self.phrase_rescore(node, &fields);

            let residual = residual_text(node, term);
            if !residual.is_empty() {
                extras.suggest = Some(Suggest::for_titles(
                    residual.as_str(),
                    include_redirects,
                    &self.config.suggest,
                ));
                self.context.suggest = Some(residual);
            }
        }

        debug!(
            term,
            clauses = clauses.len(),
            filters = self.context.filters.len(),
            rescore = extras.rescore.is_some(),
            "built full text query"
        );
        self.search(query, extras, description).await
    }

    /// Finds documents similar to the document `id`.
    ///
    /// Returns `None` when the source document does not exist.
    pub async fn more_like_this(mut self, id: u64) -> Option<SearchOutcome> {
        let description = format!("more like {id}");
        let backend = Arc::clone(&self.backend);
        let fetched = self
            .gate
            .run(async move {
                backend
                    .get(IndexTarget::All, id, vec![TEXT_FIELD.to_string()])
                    .await
            })
            .await;

        let source = match DocumentLookup::from(fetched) {
            DocumentLookup::Found(source) => source,
            DocumentLookup::NotFound => {
                debug!(id, "more like this source document not found");
                return None;
            }
            DocumentLookup::Failed(err) => {
                return Some(SearchOutcome::backend_failure(&description, &err));
            }
        };

        self.context.add_not_filter(dsl::ids(&[id]));
        let query = dsl::more_like_this(&strip_markup(&source.text), &self.config.more_like_this);
        Some(self.search(query, RequestExtras::default(), description).await)
    }

    /// Returns the weighted full-text fields.
    fn full_text_fields(&self, include_redirects: bool) -> Vec<String> {
        let weights = &self.config.search;
        let mut fields = vec![
            format!("title^{}", weights.title_weight),
            format!("heading^{}", weights.heading_weight),
            TEXT_FIELD.to_string(),
        ];
        if include_redirects {
            fields.push(format!("redirect.title^{}", weights.redirect_weight));
        }
        fields
    }

    /// Builds the phrase rescore for a plain word query.
    ///
    /// Queries with an explicit phrase, wildcard or fuzzy syntax are left alone, as are
    /// queries without positive words.
    fn phrase_rescore(&self, node: &QueryNode, fields: &[String]) -> Option<Rescore> {
        if !self.config.rescore.enabled()
            || node.contains_phrase()
            || node.contains_special_syntax()
        {
            return None;
        }
        let words = positive_words(node);
        if words.is_empty() {
            return None;
        }
        let phrase = format!("\"{}\"", escape_phrase(&words.join(" ")));
        let query = dsl::query_string(&phrase, fields, self.config.search.phrase_slop);
        Some(Rescore::phrase(query, &self.config.rescore))
    }
}

/// Returns the text of top-level, non-negated words.
fn positive_words(node: &QueryNode) -> Vec<&str> {
    node.clauses()
        .iter()
        .filter_map(|clause| match clause {
            QueryNode::Words { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Returns the source text of every non-keyword clause, space-separated.
fn residual_text(node: &QueryNode, source: &str) -> String {
    node.clauses()
        .iter()
        .filter(|clause| !matches!(clause, QueryNode::Keyword(_)))
        .map(|clause| clause.text_in(source).trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
