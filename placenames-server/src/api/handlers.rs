//! HTTP handlers.
//!
//! Handlers only translate between HTTP and the [`QueryEngine`]; the index
//! itself is immutable and shared, so no handler takes a lock.

use axum::extract::{Path, Query, State};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use placenames_core::QueryEngine;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::{HealthResponse, PrefixParams, PrefixResponse};

/// Shared handler state: the query engine and the Prometheus handle that
/// renders `/metrics`.
#[derive(Clone)]
pub struct AppState {
    pub engine: QueryEngine,
    pub prometheus_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(engine: QueryEngine, prometheus_handle: PrometheusHandle) -> Self {
        Self {
            engine,
            prometheus_handle,
        }
    }
}

/// `GET /healthz`: liveness plus index size.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.engine.index().stats();
    Json(HealthResponse {
        status: "ok".to_owned(),
        entries: stats.num_entries,
        nodes: stats.num_nodes,
    })
}

/// `GET /v1/place-names/prefix/:query?max_results=N`
pub async fn prefix(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<PrefixParams>,
) -> Result<Json<PrefixResponse>, ApiError> {
    suggest(&state, &query, params)
}

/// `GET /v1/place-names/prefix?max_results=N`: the empty prefix, which
/// returns the overall top entries.
pub async fn top(
    State(state): State<AppState>,
    Query(params): Query<PrefixParams>,
) -> Result<Json<PrefixResponse>, ApiError> {
    suggest(&state, "", params)
}

fn suggest(
    state: &AppState,
    query: &str,
    params: PrefixParams,
) -> Result<Json<PrefixResponse>, ApiError> {
    let results = state
        .engine
        .suggest(query, params.max_results.as_deref())?;
    debug!(query, results = results.len(), "prefix lookup");
    metrics::record_lookup(results.len());
    Ok(Json(PrefixResponse { results }))
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}
