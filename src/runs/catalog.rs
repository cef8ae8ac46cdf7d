//! Seeded generation of the in-memory run collection.
//!
//! The catalog is built once at startup and shared read-only afterwards.
//! Generation is driven by a seeded [`StdRng`] so fixtures are reproducible.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::model::{AgentRun, RunStatus};

/// Agent names a generated run may carry.
pub const AGENT_NAMES: [&str; 8] = [
    "DataProcessor",
    "ContentAnalyzer",
    "ImageClassifier",
    "SentimentAnalyzer",
    "CodeGenerator",
    "DocumentParser",
    "QueryOptimizer",
    "RecommendationEngine",
];

/// Error messages attached to failed runs.
pub const ERROR_MESSAGES: [&str; 6] = [
    "Network timeout exceeded",
    "Invalid API credentials",
    "Resource not found",
    "Rate limit exceeded",
    "Internal server error",
    "Database connection failed",
];

/// Start times are spread over this window before the generation instant.
const START_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;
const MAX_DURATION_SECS: u64 = 3600;
const MAX_TOKENS: u64 = 50_000;

/// Immutable collection of runs, cheap to clone.
#[derive(Debug, Clone)]
pub struct RunCatalog {
    runs: Arc<[AgentRun]>,
}

impl RunCatalog {
    /// Generate `size` runs from `seed`, with start times before `now`.
    ///
    /// The result is ordered by `started_at`, newest first.
    #[must_use]
    pub fn generate(size: usize, seed: u64, now: DateTime<Utc>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut runs: Vec<AgentRun> = (1..=size)
            .map(|n| {
                let status = RunStatus::ALL[rng.gen_range(0..RunStatus::ALL.len())];
                let agent_name = AGENT_NAMES[rng.gen_range(0..AGENT_NAMES.len())];
                let started_at = now - TimeDelta::milliseconds(rng.gen_range(0..START_WINDOW_MS));
                let duration = rng.gen_range(0..MAX_DURATION_SECS);
                let tokens_used = rng.gen_range(0..MAX_TOKENS);
                let error_message = (status == RunStatus::Failed)
                    .then(|| ERROR_MESSAGES[rng.gen_range(0..ERROR_MESSAGES.len())].to_string());

                AgentRun {
                    run_id: format!("run-{n:02}"),
                    agent_name: agent_name.to_string(),
                    status,
                    started_at,
                    duration,
                    tokens_used,
                    error_message,
                }
            })
            .collect();

        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        info!(
            name: "runs.catalog.generated",
            size,
            seed,
            "Run catalog generated"
        );

        Self::from(runs)
    }

    /// Number of runs in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// All runs, in catalog order.
    #[must_use]
    pub fn runs(&self) -> &[AgentRun] {
        &self.runs
    }

    /// Find a run by exact identifier.
    #[must_use]
    pub fn find(&self, run_id: &str) -> Option<&AgentRun> {
        self.runs.iter().find(|run| run.run_id == run_id)
    }
}

impl From<Vec<AgentRun>> for RunCatalog {
    fn from(runs: Vec<AgentRun>) -> Self {
        Self { runs: runs.into() }
    }
}
