//! End-to-end tests over the dashboard's run-history flow: wire-shaped JSON
//! in, flattened display rows out.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::json;

use wharf_core::observability::{init_logging, LogFormat};
use wharf_flow::prelude::*;

fn transfer_run(
    run_id: &str,
    execution_id: &str,
    status: &str,
    modified_at: &str,
) -> serde_json::Value {
    json!({
        "transfer_run_id": run_id,
        "transfer_id": "0a0a0a0a-0000-0000-0000-000000000001",
        "status": status,
        "created_at": "2025-01-13T09:30:00Z",
        "modified_at": modified_at,
        "meta": {
            "execution_id": execution_id,
            "retry_max_attempts": 3
        }
    })
}

#[test]
fn flattens_a_wire_shaped_history_into_display_rows() {
    init_logging(LogFormat::Pretty);

    let schedule: Schedule = serde_json::from_value(json!({
        "frequency": "WEEKLY",
        "day": 1,
        "hour": 9,
        "minute": 30
    }))
    .unwrap();
    schedule.validate().unwrap();

    // Four executions: one mid-retry with an attempt running, one that
    // exhausted its budget failing, one still inside its budget, and one
    // clean success.
    let history = json!([
        transfer_run(
            "00000000-0000-0000-0000-0000000000a1",
            "11111111-0000-0000-0000-000000000001",
            "FAILURE",
            "2025-01-13T09:31:00Z"
        ),
        transfer_run(
            "00000000-0000-0000-0000-0000000000a2",
            "11111111-0000-0000-0000-000000000001",
            "RUNNING",
            "2025-01-13T09:45:00Z"
        ),
        transfer_run(
            "00000000-0000-0000-0000-0000000000b1",
            "11111111-0000-0000-0000-000000000002",
            "FAILURE",
            "2025-01-06T09:31:00Z"
        ),
        transfer_run(
            "00000000-0000-0000-0000-0000000000b2",
            "11111111-0000-0000-0000-000000000002",
            "FAILURE",
            "2025-01-06T09:45:00Z"
        ),
        transfer_run(
            "00000000-0000-0000-0000-0000000000b3",
            "11111111-0000-0000-0000-000000000002",
            "FAILURE",
            "2025-01-06T09:59:00Z"
        ),
        transfer_run(
            "00000000-0000-0000-0000-0000000000c1",
            "11111111-0000-0000-0000-000000000003",
            "FAILURE",
            "2024-12-30T09:31:00Z"
        ),
        transfer_run(
            "00000000-0000-0000-0000-0000000000d1",
            "11111111-0000-0000-0000-000000000004",
            "SUCCESS",
            "2024-12-23T09:42:00Z"
        ),
    ]);
    let runs: Vec<TransferRun> = serde_json::from_value(history).unwrap();

    // Wednesday 2025-01-15, 10:00 UTC; next Monday is the 20th.
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
    let rows = flatten_runs(&runs, &schedule, now).unwrap();

    assert_eq!(rows.len(), 5);
    let statuses: Vec<RunStatus> = rows.iter().map(ExecutionGroupView::status).collect();
    assert_eq!(
        statuses,
        vec![
            RunStatus::Scheduled,
            RunStatus::Running,
            RunStatus::Failure,
            RunStatus::Retrying,
            RunStatus::Success,
        ]
    );

    let ExecutionGroupView::Scheduled { scheduled_at } = &rows[0] else {
        panic!("expected the scheduled placeholder first");
    };
    assert_eq!(*scheduled_at, Utc.with_ymd_and_hms(2025, 1, 20, 9, 30, 0).unwrap());

    // The rows serialize with their discriminator for the dashboard.
    let serialized = serde_json::to_value(&rows).unwrap();
    assert_eq!(serialized[0]["kind"], "scheduled");
    assert_eq!(serialized[1]["kind"], "attempt");
    assert_eq!(serialized[3]["run"]["status"], "RETRYING");
}

#[test]
fn describes_the_same_schedule_the_table_is_headed_by() {
    let schedule = Schedule::weekly(1, 9, 30);
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
    assert_eq!(
        schedule.describe(now, Tz::UTC),
        "Runs weekly on Monday at 9:30 AM"
    );
}

#[test]
fn a_new_destination_with_no_history_still_gets_a_placeholder_row() {
    let schedule = Schedule::six_hourly(0);
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();

    let rows = flatten_runs(&[], &schedule, now).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status(), RunStatus::Scheduled);

    let ExecutionGroupView::Scheduled { scheduled_at } = &rows[0] else {
        panic!("expected the scheduled placeholder");
    };
    assert_eq!(*scheduled_at, Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap());
}
