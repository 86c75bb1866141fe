//! # wharf-flow
//!
//! Schedule computation and transfer-run reconciliation for the wharf
//! data-export platform.
//!
//! This crate implements the computation core behind the dashboard:
//!
//! - **Next-Run Computation**: The exact UTC instant a recurring schedule
//!   fires next
//! - **Schedule Description**: The user-facing sentence describing a
//!   schedule, rendered in the viewer's timezone
//! - **Run Reconciliation**: Reduction of a retried transfer-run history to
//!   one display row per logical execution
//! - **Task Polling**: A bounded state machine over background-task status
//!
//! ## Guarantees
//!
//! - **Deterministic**: Every computation takes its reference instant as an
//!   argument; nothing reads the ambient clock
//! - **Pure**: Inputs are never mutated and there is no shared state, so
//!   concurrent callers never interfere
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use chrono_tz::Tz;
//! use wharf_flow::error::Result;
//! use wharf_flow::reconcile::flatten_runs;
//! use wharf_flow::schedule::Schedule;
//!
//! # fn main() -> Result<()> {
//! let schedule = Schedule::daily(9, 30);
//! let now = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
//!
//! // The next run lands tomorrow at the configured time.
//! let next = schedule.next_run(now)?;
//! assert_eq!(next, Utc.with_ymd_and_hms(2025, 1, 16, 9, 30, 0).unwrap());
//!
//! // Describe it for a viewer, and flatten an (empty) run history.
//! assert_eq!(schedule.describe(now, Tz::UTC), "Runs daily at 9:30 AM");
//! let rows = flatten_runs(&[], &schedule, now)?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod poll;
pub mod reconcile;
pub mod run;
pub mod schedule;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::poll::{PollState, TaskPoller, TaskStatus};
    pub use crate::reconcile::flatten_runs;
    pub use crate::run::{ExecutionGroupView, RunMeta, RunStatus, TransferRun};
    pub use crate::schedule::{
        Frequency, ReplicationMode, ReplicationPlan, Schedule, INVALID_SCHEDULE_TEXT,
    };
}
