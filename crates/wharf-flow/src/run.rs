//! Transfer-run records and the per-execution display view.
//!
//! A transfer run is one attempt to execute a transfer; the execution engine
//! creates and updates them, this crate only reads. Retries share an
//! execution ID, and [`crate::reconcile::flatten_runs`] reduces each group
//! of attempts to the single entry the dashboard shows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wharf_core::{ExecutionId, TransferId, TransferRunId};

/// Status of a transfer-run attempt.
///
/// `Running`, `Success`, and `Failure` arrive from the API. `Retrying` and
/// `Scheduled` are synthesized for display and never appear on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Attempt is executing.
    Running,
    /// Attempt completed successfully.
    Success,
    /// Attempt failed.
    Failure,
    /// Latest attempt failed but the retry budget is not exhausted.
    Retrying,
    /// Synthetic placeholder for the next scheduled execution.
    Scheduled,
}

impl RunStatus {
    /// Returns true if this status ends an attempt.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }

    /// Returns true for the display-only statuses the core synthesizes.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Self::Retrying | Self::Scheduled)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "RUNNING"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Retrying => write!(f, "RETRYING"),
            Self::Scheduled => write!(f, "SCHEDULED"),
        }
    }
}

/// Per-run metadata stamped by the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMeta {
    /// Groups every retry attempt belonging to one logical execution.
    /// Absent on malformed records; such records group under the absent key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<ExecutionId>,
    /// Attempt ceiling for the execution group. Carried per run and assumed
    /// identical across a group.
    #[serde(default)]
    pub retry_max_attempts: u32,
}

/// One attempt to execute a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRun {
    /// Unique attempt identifier.
    pub transfer_run_id: TransferRunId,
    /// The transfer this attempt executed.
    pub transfer_id: TransferId,
    /// Attempt status.
    pub status: RunStatus,
    /// Attempt start.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub modified_at: DateTime<Utc>,
    /// Engine metadata (execution grouping, retry budget).
    pub meta: RunMeta,
}

/// The single entry chosen to represent an execution group for display.
///
/// Either a historical attempt (possibly relabeled `Retrying`) or the
/// synthetic placeholder for the next scheduled run. Carries no identity of
/// its own beyond the run it wraps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionGroupView {
    /// Synthetic placeholder for the next scheduled execution.
    Scheduled {
        /// When the schedule next fires.
        scheduled_at: DateTime<Utc>,
    },
    /// A historical attempt chosen to represent its execution group.
    Attempt {
        /// The representative run. Its status may have been rewritten to
        /// [`RunStatus::Retrying`]; every other field is preserved.
        run: TransferRun,
    },
}

impl ExecutionGroupView {
    /// Status the dashboard renders for this entry.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        match self {
            Self::Scheduled { .. } => RunStatus::Scheduled,
            Self::Attempt { run } => run.status,
        }
    }
}
