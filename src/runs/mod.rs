//! Agent run records and the mock API that serves them.
//!
//! The collection is generated once per process from a seed and never
//! changes afterwards. Listing and lookup are asynchronous and simulate
//! network latency; listing also simulates intermittent upstream failures
//! through an injectable [`FaultPolicy`].
//!
//! # Architecture
//!
//! - [`RunCatalog`]: seeded, immutable collection of [`AgentRun`]s
//! - [`RunsQuery`] / [`Page`]: filter, sort, and paginate
//! - [`RunsService`]: latency + fault injection around the catalog
//! - [`timeline`]: execution steps for the detail view
//!
//! # Example
//!
//! ```rust
//! use agent_runs_dashboard::runs::{LatencyProfile, NoFaults, RunCatalog, RunsQuery, RunsService};
//! use std::sync::Arc;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let catalog = RunCatalog::generate(50, 7, chrono::Utc::now());
//!     let service = RunsService::with_options(catalog, Arc::new(NoFaults), LatencyProfile::none(), 7);
//!
//!     let page = service.list(&RunsQuery::new()).await.unwrap();
//!     assert_eq!(page.total, 50);
//!     assert_eq!(page.total_pages, 5);
//! });
//! ```

mod catalog;
mod error;
mod fault;
mod model;
mod query;
mod service;
pub mod timeline;

pub use catalog::{AGENT_NAMES, ERROR_MESSAGES, RunCatalog};
pub use error::{Result, RunsError};
pub use fault::{
    FaultInjector, FaultPolicy, MAX_FAULT_BURST, NoFaults, RandomFaults, ScriptedFaults,
};
pub use model::{AgentRun, RunStatus, SortOrder, StatusFilter, StatusVariant};
pub use query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, RunsQuery};
pub use service::{LatencyProfile, RunsApi, RunsService};
pub use timeline::{ExecutionStep, StepKind, execution_steps};
