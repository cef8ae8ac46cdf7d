//! JSON API over the runs service.
//!
//! - `GET /api/runs`: one page of runs
//! - `GET /api/runs/{id}`: one run with its execution timeline
//! - `GET /health`: liveness check

pub mod routes;

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::runs::{RunsError, RunsQuery};

pub use routes::build_router;

/// Listing parameters as they arrive in the query string.
///
/// Shared by the JSON API and the HTML dashboard.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl TryFrom<ListParams> for RunsQuery {
    type Error = RunsError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let defaults = RunsQuery::default();
        Ok(RunsQuery {
            page: params.page.unwrap_or(defaults.page),
            page_size: params.page_size.unwrap_or(defaults.page_size),
            search: params.search.unwrap_or_default(),
            status: params.status.as_deref().unwrap_or("all").parse()?,
            sort_order: params.sort_order.as_deref().unwrap_or("desc").parse()?,
        })
    }
}

/// Turn an extracted (or rejected) query string into a validated query.
///
/// A malformed query string is reported as [`RunsError::InvalidQuery`] so
/// both surfaces answer it like any other invalid parameter.
pub fn list_query(
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<RunsQuery, RunsError> {
    let Query(params) =
        params.map_err(|rejection| RunsError::InvalidQuery(rejection.body_text()))?;
    RunsQuery::try_from(params)
}

/// Body of every JSON error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// HTTP status for a runs error.
#[must_use]
pub fn status_for(err: &RunsError) -> StatusCode {
    match err {
        RunsError::Transient => StatusCode::SERVICE_UNAVAILABLE,
        RunsError::NotFound { .. } => StatusCode::NOT_FOUND,
        RunsError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
    }
}
