// Handlers: version, snapshot collection and history

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::collector;
use crate::engine::EngineConnector;
use crate::version::{NAME, VERSION, banner};

const DEFAULT_LIST_LIMIT: u32 = 50;
const MAX_LIST_LIMIT: u32 = 1000;

pub(super) async fn root_handler() -> impl IntoResponse {
    banner()
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// POST /api/snapshots: collect now and store; responds with the snapshot.
/// A store failure is logged; the caller still gets the snapshot.
pub(super) async fn create_snapshot_handler<C: EngineConnector>(
    State(state): State<AppState<C>>,
) -> Response {
    let deadline = state.config.engine.deadline();
    let snapshot = match collector::create_snapshot(&state.connector, deadline).await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, operation = "create_snapshot", "on-demand snapshot failed");
            return error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string());
        }
    };
    if let Err(e) = state.history_repo.save_snapshot(&snapshot).await {
        tracing::warn!(error = %e, operation = "save_snapshot", "on-demand snapshot not stored");
    }
    Json(snapshot).into_response()
}

/// GET /api/snapshots/latest: most recent stored snapshot, 404 when none.
pub(super) async fn latest_snapshot_handler<C: EngineConnector>(
    State(state): State<AppState<C>>,
) -> Response {
    match state.history_repo.latest_snapshot().await {
        Ok(Some(snapshot)) => Json(snapshot).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "no snapshot stored yet".into()),
        Err(e) => {
            tracing::warn!(error = %e, operation = "latest_snapshot", "history read failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    limit: Option<u32>,
}

/// GET /api/snapshots?limit=N: newest summaries first.
pub(super) async fn list_snapshots_handler<C: EngineConnector>(
    State(state): State<AppState<C>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(MAX_LIST_LIMIT);
    match state.history_repo.recent_summaries(limit).await {
        Ok(summaries) => Json(summaries).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "recent_summaries", "history read failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
