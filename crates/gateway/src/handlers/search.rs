//! Search handlers

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::AppState;
use itemsearch_common::errors::Result;
use itemsearch_search::{PagedResult, RequestContext, SearchArguments, SearchRecord};

/// Index listing response
#[derive(Serialize)]
pub struct IndexesResponse {
    pub default_index: String,
    pub indexes: Vec<IndexSummary>,
}

#[derive(Serialize)]
pub struct IndexSummary {
    pub name: String,
    pub records: usize,
}

/// Run a search
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(args): Json<SearchArguments>,
) -> Result<Json<PagedResult<SearchRecord>>> {
    let ctx = RequestContext {
        current_language: header_value(&headers, &state.config.search.language_header),
    };

    let page = state.orchestrator.resolve(&args, &ctx).await?;

    Ok(Json(page))
}

/// List loaded indexes
pub async fn list_indexes(State(state): State<AppState>) -> Json<IndexesResponse> {
    let indexes = state
        .indexes
        .index_names()
        .map(|name| IndexSummary {
            name: name.to_string(),
            records: state.indexes.record_count(name).unwrap_or_default(),
        })
        .collect();

    Json(IndexesResponse {
        default_index: state.config.search.default_index_name(),
        indexes,
    })
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
