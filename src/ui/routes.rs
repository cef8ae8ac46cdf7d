use axum::{
    Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Html,
    routing::get,
};

use super::pages::{dashboard_page, run_detail_page, run_error_page};
use crate::AppState;
use crate::api::{ListParams, list_query, status_for};
use crate::runs::RunsQuery;

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/runs/{id}", get(run_detail_handler))
}

/// GET / - Runs table with search, filter, sort, and pagination.
async fn dashboard_handler(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> (StatusCode, Html<String>) {
    let query = match list_query(params) {
        Ok(query) => query,
        Err(e) => {
            let html = dashboard_page(&RunsQuery::default(), &Err(e.clone()));
            return (status_for(&e), Html(html));
        }
    };

    let outcome = state.runs.list_runs(&query).await;
    let status = outcome.as_ref().map_or_else(status_for, |_| StatusCode::OK);
    if let Err(e) = &outcome {
        tracing::warn!(error = %e, "Dashboard listing failed");
    }
    (status, Html(dashboard_page(&query, &outcome)))
}

/// GET /runs/{id} - Run detail with execution timeline.
async fn run_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    match state.runs.get_run(&id).await {
        Ok(run) => (StatusCode::OK, Html(run_detail_page(&run))),
        Err(e) => (status_for(&e), Html(run_error_page(&id, &e))),
    }
}
