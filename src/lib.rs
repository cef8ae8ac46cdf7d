//! Agent Runs Dashboard
//!
//! A browser dashboard over "agent run" records, served by an in-memory mock
//! API that simulates network latency and intermittent upstream failures.
//!
//! # Architecture
//!
//! - **Runs**: seeded run catalog, listing/lookup service, fault injection
//! - **API**: JSON endpoints over the runs service
//! - **UI**: server-rendered HTML dashboard and run detail pages
//! - **Server**: Axum router, tracing, and timeout middleware
//!
//! # Modules
//!
//! - [`runs`]: run model, catalog, query, and service
//! - [`api`]: JSON routes
//! - [`ui`]: HTML routes and rendering
//! - [`config`]: layered configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod runs;
pub mod server;
pub mod ui;

use crate::config::AppConfig;
use crate::runs::RunsApi;

use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Runs service backing both the API and the pages.
    pub runs: Arc<dyn RunsApi>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
