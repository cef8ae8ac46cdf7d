//! Run records and the query vocabulary used to list them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::RunsError;

/// Lifecycle stage of an agent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Queued, Self::Running, Self::Succeeded, Self::Failed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }

    /// Badge variant used when rendering this status.
    #[must_use]
    pub fn variant(self) -> StatusVariant {
        match self {
            Self::Succeeded => StatusVariant::Success,
            Self::Failed => StatusVariant::Destructive,
            Self::Running => StatusVariant::Info,
            Self::Queued => StatusVariant::Warning,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = RunsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RunsError::InvalidQuery(format!("unknown run status: {s}")))
    }
}

/// Visual treatment of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusVariant {
    Success,
    Warning,
    Info,
    Destructive,
}

/// One recorded execution of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRun {
    pub run_id: String,
    pub agent_name: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration in seconds.
    pub duration: u64,
    pub tokens_used: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AgentRun {
    /// Case-insensitive substring match on run id or agent name.
    ///
    /// `needle` must already be lowercased; an empty needle matches everything.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.run_id.to_lowercase().contains(needle)
            || self.agent_name.to_lowercase().contains(needle)
    }
}

/// Status filter: a single status, or no filtering at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RunStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn accepts(self, status: RunStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

impl From<RunStatus> for StatusFilter {
    fn from(status: RunStatus) -> Self {
        Self::Only(status)
    }
}

impl FromStr for StatusFilter {
    type Err = RunsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Ordering applied to `started_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = RunsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "" | "desc" => Ok(Self::Desc),
            other => Err(RunsError::InvalidQuery(format!("unknown sort order: {other}"))),
        }
    }
}
