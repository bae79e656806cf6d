//! The search step shared by every operation.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{SearchOutcome, Searcher};
use crate::{
    backend::IndexTarget,
    dsl,
    request::{Rescore, SearchRequest, SearchType, Suggest},
    result::ResultSet,
};

/// Operation-specific parts of a request.
#[derive(Debug, Default)]
pub struct RequestExtras {
    /// Second-pass phrase rescore.
    pub rescore: Option<Rescore>,
    /// Spelling suggestion.
    pub suggest: Option<Suggest>,
}

#[allow(clippy::multiple_inherent_impl)]
impl Searcher {
    /// Completes the request around `query`, sends it through the gate and shapes the
    /// response.
    pub(super) async fn search(
        self,
        query: Value,
        extras: RequestExtras,
        description: String,
    ) -> SearchOutcome {
        let target = self.index_target();
        let request = self.build_request(query, extras);
        debug!(
            %description,
            index = %target.index_name(&self.config.index.base_name),
            body = %request.to_json(),
            "sending search request"
        );

        let backend = Arc::clone(&self.backend);
        let response = self
            .gate
            .run(async move { backend.search(target, request).await })
            .await;

        match response {
            Ok(response) => SearchOutcome::Results(ResultSet::from_response(
                response,
                self.params.shape,
                &self.context,
                &self.config.snippet,
            )),
            Err(err) => SearchOutcome::backend_failure(&description, &err),
        }
    }

    /// Wraps `query` with filters and scoring, then adds paging and result shaping.
    fn build_request(&self, query: Value, extras: RequestExtras) -> SearchRequest {
        let mut filters = self.context.filters.clone();
        if !self.params.namespaces.is_empty() {
            filters.push(dsl::terms("namespace", &self.params.namespaces));
        }
        let query = dsl::filtered(
            query,
            dsl::and_filters(filters),
            self.context.not_filters.clone(),
        );
        let query = dsl::function_score(query, self.scoring_functions());

        let mut request = SearchRequest::new(query);
        request.from = (self.params.offset > 0).then_some(self.params.offset);
        request.size = (self.params.limit > 0).then_some(self.params.limit);
        request.source = self.params.shape.source_fields();
        request.highlight = self.params.shape.highlight(&self.config.snippet);
        request.rescore = extras.rescore;
        request.suggest = extras.suggest;
        request.search_type = Some(if self.config.search.more_accurate_scoring {
            SearchType::DfsQueryThenFetch
        } else {
            SearchType::QueryThenFetch
        });
        request
    }

    /// Returns the multiplicative scoring functions for this request.
    ///
    /// Template boosts given in the query replace the configured ones entirely.
    fn scoring_functions(&self) -> Vec<Value> {
        let mut functions = Vec::new();
        if self.config.search.boost_links {
            functions.push(dsl::link_boost());
        }

        let templates = self
            .context
            .boost_templates_from_query
            .as_ref()
            .unwrap_or(&self.config.boost_templates);
        functions.extend(
            templates
                .iter()
                .map(|(template, weight)| dsl::template_boost(template, *weight)),
        );

        if let Some(recent) = self.context.prefer_recent {
            functions.push(dsl::recency_decay(
                recent.decay_portion,
                recent.half_life_days,
            ));
        }
        functions
    }

    /// Picks the index partition for the requested namespaces.
    ///
    /// All-content or all-general namespace sets use their partition; anything else,
    /// including no restriction, searches both.
    fn index_target(&self) -> IndexTarget {
        let namespaces = &self.params.namespaces;
        if namespaces.is_empty() {
            return IndexTarget::All;
        }
        let index = &self.config.index;
        if namespaces.iter().all(|ns| index.is_content_namespace(*ns)) {
            IndexTarget::Content
        } else if namespaces.iter().all(|ns| !index.is_content_namespace(*ns)) {
            IndexTarget::General
        } else {
            IndexTarget::All
        }
    }
}
