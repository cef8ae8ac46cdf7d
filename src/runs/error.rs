//! Error types for the runs service.

use thiserror::Error;

/// Failures surfaced by the listing and lookup operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunsError {
    /// Simulated upstream flakiness. Callers are expected to retry.
    #[error("transient service error, please retry")]
    Transient,

    /// No run carries the requested identifier.
    #[error("run not found: {run_id}")]
    NotFound {
        /// The identifier that was looked up.
        run_id: String,
    },

    /// Query parameters outside the accepted range.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl RunsError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// Result type alias for runs operations.
pub type Result<T> = std::result::Result<T, RunsError>;
