use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::runs::{RandomFaults, RunCatalog, RunsService};
use crate::{api, ui};

/// Build the runs service described by `config`.
///
/// Without a configured seed one is drawn at random and logged, so a run can
/// be reproduced by passing it back in.
pub fn build_runs_service(config: &AppConfig) -> RunsService {
    let seed = config.catalog.seed.unwrap_or_else(rand::random);
    let catalog = RunCatalog::generate(config.catalog.size, seed, chrono::Utc::now());
    let faults = Arc::new(RandomFaults::new(
        config.simulation.fault_probability,
        seed.wrapping_add(1),
    ));

    info!(
        name: "runs.service.ready",
        seed,
        size = catalog.len(),
        fault_probability = config.simulation.fault_probability,
        "Runs service ready"
    );

    RunsService::with_options(catalog, faults, config.simulation.latency(), seed)
}

/// Assemble the full router: pages, JSON API, tracing, and timeouts.
pub fn build_app(state: AppState) -> Router {
    let request_timeout = state.config.resilience.request_timeout();

    Router::new()
        .merge(ui::build_router())
        .merge(api::build_router())
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match request_timeout {
                    Some(limit) => match tokio::time::timeout(limit, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    },
                    None => next.run(req).await,
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let service = build_runs_service(&config);

    let state = AppState {
        runs: Arc::new(service),
        config: config.clone(),
    };
    let app = build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
