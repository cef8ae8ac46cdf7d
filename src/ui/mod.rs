//! Server-rendered dashboard pages.
//!
//! # Structure
//!
//! - [`routes`]: page handlers (`/` and `/runs/{id}`)
//! - [`pages`]: HTML rendering for the run table, pagination, and detail view
//! - [`format`]: duration, number, and date formatting

pub mod format;
pub mod pages;
pub mod routes;

pub use routes::build_router;
