//! Bounded polling of background API tasks.
//!
//! Slow dashboard operations (connection checks, destination creation) run
//! as background tasks; clients poll the task until it completes or a budget
//! expires. This module models that loop as an explicit state machine with
//! an injected clock so the behavior is testable without timers: the caller
//! owns the actual waiting and I/O and feeds every observation in, together
//! with the instant it was made.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use wharf_core::TaskId;

/// Status values a background task reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is still executing.
    Running,
    /// Task finished; its output is ready.
    Complete,
}

/// States of one polling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// No terminal status observed yet; keep polling.
    Pending,
    /// The task reported completion.
    Complete,
    /// The budget expired before a terminal status arrived.
    TimedOut,
    /// The session was aborted by a non-retryable failure.
    Error {
        /// Why the session was aborted.
        reason: String,
    },
}

impl PollState {
    /// Returns true once no further polling is useful.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Poll cadence used by the dashboard client.
const DEFAULT_INTERVAL_SECS: i64 = 3;
/// Overall budget used by the dashboard client.
const DEFAULT_TIMEOUT_SECS: i64 = 180;

/// Tracks one bounded polling session over a background task.
///
/// Failed poll requests are transient: they are logged and the session
/// stays pending until the budget runs out, matching the dashboard's
/// behavior of retrying through blips.
#[derive(Debug, Clone)]
pub struct TaskPoller {
    task_id: TaskId,
    started_at: DateTime<Utc>,
    interval: Duration,
    timeout: Duration,
    state: PollState,
}

impl TaskPoller {
    /// Creates a poller with the default 3-second interval and 180-second
    /// budget.
    #[must_use]
    pub fn new(task_id: TaskId, started_at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            started_at,
            interval: Duration::seconds(DEFAULT_INTERVAL_SECS),
            timeout: Duration::seconds(DEFAULT_TIMEOUT_SECS),
            state: PollState::Pending,
        }
    }

    /// Overrides the poll interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Overrides the overall budget.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The task this session is watching.
    #[must_use]
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Records a status observation made at `now`.
    ///
    /// Completion wins even when observed after the budget expired; an
    /// answer in hand beats a timeout.
    pub fn observe_status(&mut self, status: TaskStatus, now: DateTime<Utc>) -> &PollState {
        if self.state.is_terminal() {
            return &self.state;
        }
        if status == TaskStatus::Complete {
            self.state = PollState::Complete;
        } else if self.budget_spent(now) {
            self.state = PollState::TimedOut;
        }
        &self.state
    }

    /// Records a failed poll attempt at `now`.
    ///
    /// Transient by contract; the session only ends if the budget is
    /// already spent.
    pub fn observe_failure(&mut self, now: DateTime<Utc>) -> &PollState {
        if self.state.is_terminal() {
            return &self.state;
        }
        tracing::warn!(task_id = %self.task_id, "task status poll failed");
        if self.budget_spent(now) {
            self.state = PollState::TimedOut;
        }
        &self.state
    }

    /// Aborts the session with a non-retryable failure.
    pub fn abort(&mut self, reason: impl Into<String>) -> &PollState {
        if !self.state.is_terminal() {
            self.state = PollState::Error {
                reason: reason.into(),
            };
        }
        &self.state
    }

    /// When the caller should issue the next poll, or `None` once the
    /// session is terminal.
    #[must_use]
    pub fn next_poll_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.state.is_terminal() {
            None
        } else {
            Some(now + self.interval)
        }
    }

    fn budget_spent(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at > self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
    }

    fn poller() -> TaskPoller {
        TaskPoller::new(TaskId::generate(), start())
    }

    #[test]
    fn stays_pending_while_the_task_runs() {
        let mut poller = poller();
        let state = poller.observe_status(TaskStatus::Running, start() + Duration::seconds(3));
        assert_eq!(*state, PollState::Pending);
        assert!(poller.next_poll_at(start()).is_some());
    }

    #[test]
    fn completes_when_the_task_reports_complete() {
        let mut poller = poller();
        poller.observe_status(TaskStatus::Complete, start() + Duration::seconds(6));
        assert_eq!(*poller.state(), PollState::Complete);
        assert!(poller.next_poll_at(start()).is_none());
    }

    #[test]
    fn times_out_once_the_budget_is_spent() {
        let mut poller = poller();
        let at_budget = start() + Duration::seconds(180);
        assert_eq!(*poller.observe_status(TaskStatus::Running, at_budget), PollState::Pending);
        let past_budget = start() + Duration::seconds(181);
        assert_eq!(
            *poller.observe_status(TaskStatus::Running, past_budget),
            PollState::TimedOut
        );
    }

    #[test]
    fn completion_wins_even_past_the_budget() {
        let mut poller = poller();
        let past_budget = start() + Duration::seconds(600);
        poller.observe_status(TaskStatus::Complete, past_budget);
        assert_eq!(*poller.state(), PollState::Complete);
    }

    #[test]
    fn failed_polls_are_transient_until_the_budget_runs_out() {
        let mut poller = poller();
        assert_eq!(
            *poller.observe_failure(start() + Duration::seconds(30)),
            PollState::Pending
        );
        assert_eq!(
            *poller.observe_failure(start() + Duration::seconds(200)),
            PollState::TimedOut
        );
    }

    #[test]
    fn abort_is_terminal_and_sticky() {
        let mut poller = poller();
        poller.abort("task was deleted");
        assert_eq!(
            *poller.state(),
            PollState::Error {
                reason: "task was deleted".into()
            }
        );
        // Later observations cannot resurrect the session.
        poller.observe_status(TaskStatus::Complete, start() + Duration::seconds(9));
        assert!(matches!(poller.state(), PollState::Error { .. }));
    }

    #[test]
    fn custom_interval_drives_the_next_poll_instant() {
        let poller = poller().with_interval(Duration::seconds(10));
        let now = start() + Duration::seconds(40);
        assert_eq!(poller.next_poll_at(now), Some(now + Duration::seconds(10)));
    }
}
