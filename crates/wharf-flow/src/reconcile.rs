//! Reduction of retried transfer runs to one display row per execution.
//!
//! The run history arrives as a flat list of attempts; retries of the same
//! logical execution share an execution ID. The dashboard shows one row per
//! execution, headed by a synthetic placeholder for the next scheduled run,
//! so this module reduces each group of attempts to a single representative
//! under a deterministic priority rule.
//!
//! The reduction is a pure, single pass over a point-in-time snapshot:
//! inputs are never mutated, and the same snapshot always produces the same
//! rows.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use wharf_core::ExecutionId;

use crate::error::Result;
use crate::run::{ExecutionGroupView, RunStatus, TransferRun};
use crate::schedule::Schedule;

/// Flattens a transfer-run history into one entry per execution group,
/// preceded by the synthetic placeholder for the next scheduled run.
///
/// Groups are keyed by `meta.execution_id` (an absent ID is a valid key)
/// and emitted in the order each group first appears in the input. Within a
/// group the representative is chosen by, in priority order:
///
/// 1. the first attempt still running;
/// 2. with the retry budget exhausted, the first success if any, else the
///    final attempt as-is;
/// 3. with budget remaining and no success yet, the final attempt relabeled
///    [`RunStatus::Retrying`];
/// 4. otherwise the first success.
///
/// Output length is always `1 + ` the number of distinct execution keys.
///
/// # Errors
///
/// [`crate::error::Error::InvalidSchedule`] when the placeholder's next-run
/// instant cannot be computed from `schedule`.
pub fn flatten_runs(
    runs: &[TransferRun],
    schedule: &Schedule,
    now: DateTime<Utc>,
) -> Result<Vec<ExecutionGroupView>> {
    let mut flat = Vec::with_capacity(runs.len() + 1);

    // The upcoming run leads the table regardless of history.
    flat.push(ExecutionGroupView::Scheduled {
        scheduled_at: schedule.next_run(now)?,
    });

    let mut order: Vec<Option<ExecutionId>> = Vec::new();
    let mut groups: HashMap<Option<ExecutionId>, Vec<&TransferRun>> = HashMap::new();
    for run in runs {
        let key = run.meta.execution_id;
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(run);
    }

    for key in &order {
        if let Some(view) = groups.get(key).and_then(|bucket| representative(bucket)) {
            flat.push(view);
        }
    }

    Ok(flat)
}

/// Selects the run that represents one execution group.
///
/// Returns `None` only for an empty bucket, which grouping never produces.
fn representative(bucket: &[&TransferRun]) -> Option<ExecutionGroupView> {
    // An attempt that is still executing always wins.
    if let Some(running) = bucket.iter().find(|r| r.status == RunStatus::Running) {
        return Some(ExecutionGroupView::Attempt {
            run: (*running).clone(),
        });
    }

    let max_attempts = bucket.first()?.meta.retry_max_attempts;
    let success = bucket.iter().find(|r| r.status == RunStatus::Success);
    let last = (*bucket.last()?).clone();

    let exhausted = u32::try_from(bucket.len()) == Ok(max_attempts);
    let run = if exhausted {
        // Budget spent: the success if there was one, else the final failure.
        success.map_or(last, |r| (*r).clone())
    } else if let Some(success) = success {
        (*success).clone()
    } else {
        // Retry sequence still in flight.
        TransferRun {
            status: RunStatus::Retrying,
            ..last
        }
    };

    Some(ExecutionGroupView::Attempt { run })
}
