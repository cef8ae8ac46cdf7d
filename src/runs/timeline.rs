//! Execution timeline shown on the run detail view.

use serde::Serialize;

use super::model::RunStatus;

/// Which stage a timeline step represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepKind {
    Queued,
    Running,
    Completed,
    Failed,
}

impl StepKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// One entry of the execution timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionStep {
    pub kind: StepKind,
    pub label: &'static str,
    pub completed: bool,
    /// Caption for a reached step. The queued step carries none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl ExecutionStep {
    fn new(kind: StepKind, completed: bool) -> Self {
        let description = match kind {
            _ if !completed => None,
            StepKind::Queued => None,
            StepKind::Running => Some("Processing in progress"),
            StepKind::Completed => Some("Successfully completed"),
            StepKind::Failed => Some("Execution encountered an error"),
        };
        Self {
            kind,
            label: kind.label(),
            completed,
            description,
        }
    }
}

/// Derive the three-step timeline for a run in `status`.
#[must_use]
pub fn execution_steps(status: RunStatus) -> [ExecutionStep; 3] {
    let started = matches!(
        status,
        RunStatus::Running | RunStatus::Succeeded | RunStatus::Failed
    );
    let finished = matches!(status, RunStatus::Succeeded | RunStatus::Failed);
    let last = if status == RunStatus::Failed {
        StepKind::Failed
    } else {
        StepKind::Completed
    };

    [
        ExecutionStep::new(StepKind::Queued, true),
        ExecutionStep::new(StepKind::Running, started),
        ExecutionStep::new(last, finished),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(status: RunStatus) -> Vec<bool> {
        execution_steps(status).iter().map(|s| s.completed).collect()
    }

    #[test]
    fn test_completion_per_status() {
        assert_eq!(completed(RunStatus::Queued), [true, false, false]);
        assert_eq!(completed(RunStatus::Running), [true, true, false]);
        assert_eq!(completed(RunStatus::Succeeded), [true, true, true]);
        assert_eq!(completed(RunStatus::Failed), [true, true, true]);
    }

    #[test]
    fn test_final_step_label() {
        assert_eq!(execution_steps(RunStatus::Failed)[2].label, "Failed");
        assert_eq!(execution_steps(RunStatus::Succeeded)[2].label, "Completed");
        assert_eq!(execution_steps(RunStatus::Queued)[2].label, "Completed");
    }

    #[test]
    fn test_descriptions() {
        let steps = execution_steps(RunStatus::Failed);
        assert_eq!(steps[0].description, None);
        assert_eq!(steps[1].description, Some("Processing in progress"));
        assert_eq!(steps[2].description, Some("Execution encountered an error"));

        let steps = execution_steps(RunStatus::Running);
        assert_eq!(steps[2].description, None);

        let steps = execution_steps(RunStatus::Succeeded);
        assert_eq!(steps[2].description, Some("Successfully completed"));
    }
}
