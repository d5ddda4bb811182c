//! Health check handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub default_index: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: itemsearch_common::VERSION,
        timestamp: Utc::now(),
    })
}

/// Readiness probe - the default index must be loaded
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let default_index = state.config.search.default_index_name();

    let index_check = match state.indexes.record_count(&default_index) {
        Some(records) => CheckResult {
            status: "up".to_string(),
            records: Some(records),
            error: None,
        },
        None => CheckResult {
            status: "down".to_string(),
            records: None,
            error: Some(format!("index '{}' is not loaded", default_index)),
        },
    };

    let all_healthy = index_check.status == "up";

    Json(ReadyResponse {
        status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
        checks: HealthChecks {
            default_index: index_check,
        },
    })
}
