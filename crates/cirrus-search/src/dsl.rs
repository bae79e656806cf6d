//! Constructors for backend query DSL fragments.
//!
//! The backend accepts Elasticsearch-style JSON. Every helper returns a plain
//! [`serde_json::Value`] so fragments compose freely.

use cirrus_config::MoreLikeThisSettings;
use serde::Serialize;
use serde_json::{Value, json};

/// Analyzer used for prefix search input.
const PREFIX_ANALYZER: &str = "prefix_query";

/// Matches every document.
pub fn match_all() -> Value {
    json!({ "match_all": {} })
}

/// A `match` query on one field.
pub fn match_field(field: &str, value: &str) -> Value {
    json!({ "match": { field: value } })
}

/// Matches any of `values` on `field`.
///
/// A single value becomes a plain `match`; several become a `bool` of `should` clauses.
pub fn match_any(field: &str, values: &[String]) -> Value {
    match values {
        [single] => match_field(field, single),
        _ => json!({
            "bool": {
                "should": values.iter().map(|v| match_field(field, v)).collect::<Vec<_>>()
            }
        }),
    }
}

/// Prefix match against the prefix-indexed title field.
///
/// The term is lower-cased and otherwise passed through the keyword analyzer untouched.
pub fn title_prefix(term: &str) -> Value {
    json!({
        "match": {
            "title.prefix": {
                "query": term.to_lowercase(),
                "analyzer": PREFIX_ANALYZER,
            }
        }
    })
}

/// A full-text `query_string` query.
pub fn query_string(query: &str, fields: &[String], phrase_slop: u32) -> Value {
    json!({
        "query_string": {
            "query": query,
            "fields": fields,
            "auto_generate_phrase_queries": true,
            "phrase_slop": phrase_slop,
            "default_operator": "AND",
            "allow_leading_wildcard": false,
            "fuzzy_prefix_length": 2,
        }
    })
}

/// A `query_string` filter over `fields` with AND semantics, used for negated field terms.
pub fn query_string_filter(query: &str, fields: &[&str]) -> Value {
    json!({
        "query_string": {
            "query": query,
            "fields": fields,
            "default_operator": "AND",
        }
    })
}

/// Restricts `field` to any of `values`.
pub fn terms<T: Serialize>(field: &str, values: &[T]) -> Value {
    json!({ "terms": { field: values } })
}

/// Matches documents by id.
pub fn ids(values: &[u64]) -> Value {
    json!({ "ids": { "values": values } })
}

/// Combines filters with AND.
///
/// Returns `None` when there is nothing to filter, the filter itself when there is one, and
/// a `bool` of `must` clauses otherwise.
pub fn and_filters(mut filters: Vec<Value>) -> Option<Value> {
    match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(json!({ "bool": { "must": filters } })),
    }
}

/// Wraps `query` with a positive filter and negative filters.
pub fn filtered(query: Value, filter: Option<Value>, not_filters: Vec<Value>) -> Value {
    if filter.is_none() && not_filters.is_empty() {
        return query;
    }
    let mut bool_query = json!({ "must": [query] });
    if let Some(filter) = filter {
        bool_query["filter"] = json!([filter]);
    }
    if !not_filters.is_empty() {
        bool_query["must_not"] = Value::Array(not_filters);
    }
    json!({ "bool": bool_query })
}

/// Multiplies the score of `query` by each of `functions`.
pub fn function_score(query: Value, functions: Vec<Value>) -> Value {
    if functions.is_empty() {
        return query;
    }
    json!({
        "function_score": {
            "query": query,
            "functions": functions,
            "score_mode": "multiply",
            "boost_mode": "multiply",
        }
    })
}

/// Score multiplier from incoming links and redirects.
pub fn link_boost() -> Value {
    json!({
        "script_score": {
            "script": "Math.log10(doc['links'].value + doc['redirect_links'].value + 2)"
        }
    })
}

/// Score multiplier for documents using `template`.
pub fn template_boost(template: &str, weight: f64) -> Value {
    json!({
        "filter": match_field("template", template),
        "weight": weight,
    })
}

/// Exponential recency decay on the last edit timestamp.
///
/// A fraction `decay_portion` of the score halves every `half_life_days`; the remainder is
/// left alone.
pub fn recency_decay(decay_portion: f64, half_life_days: f64) -> Value {
    json!({
        "script_score": {
            "script": {
                "source": "(1 - params.decay) + params.decay * Math.pow(0.5, (System.currentTimeMillis() - doc['timestamp'].value.toInstant().toEpochMilli()) / params.half_life_ms)",
                "params": {
                    "decay": decay_portion,
                    "half_life_ms": half_life_days * 86_400_000.0,
                }
            }
        }
    })
}

/// A "more like this" query over the body text.
pub fn more_like_this(text: &str, settings: &MoreLikeThisSettings) -> Value {
    let mut mlt = json!({
        "fields": ["text"],
        "like_text": text,
        "min_doc_freq": settings.min_doc_freq,
        "max_query_terms": settings.max_query_terms,
        "min_term_freq": settings.min_term_freq,
        "percent_terms_to_match": settings.percent_terms_to_match,
    });
    if settings.min_word_len > 0 {
        mlt["min_word_len"] = json!(settings.min_word_len);
    }
    if settings.max_word_len > 0 {
        mlt["max_word_len"] = json!(settings.max_word_len);
    }
    json!({ "more_like_this": mlt })
}
