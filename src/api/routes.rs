use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use serde_json::json;

use super::{ErrorBody, ListParams, list_query, status_for};
use crate::AppState;
use crate::runs::{AgentRun, ExecutionStep, Page, RunsError, execution_steps};

type ApiError = (StatusCode, Json<ErrorBody>);

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/runs", get(list_runs))
        .route("/api/runs/{id}", get(get_run))
}

/// Run detail with its derived timeline.
#[derive(Debug, Serialize)]
struct RunDetailResponse {
    run: AgentRun,
    timeline: [ExecutionStep; 3],
}

fn api_error(err: &RunsError) -> ApiError {
    (
        status_for(err),
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "runs": state.runs.total_runs(),
    }))
}

/// GET /api/runs - List a page of runs.
async fn list_runs(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page>, ApiError> {
    let query = list_query(params).map_err(|e| api_error(&e))?;

    match state.runs.list_runs(&query).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::warn!(error = %e, "Listing runs failed");
            Err(api_error(&e))
        }
    }
}

/// GET /api/runs/{id} - Get one run and its timeline.
async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunDetailResponse>, ApiError> {
    let run = state.runs.get_run(&id).await.map_err(|e| api_error(&e))?;
    let timeline = execution_steps(run.status);
    Ok(Json(RunDetailResponse { run, timeline }))
}
