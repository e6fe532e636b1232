use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_task_run(task: &str, status: &str, duration: Duration) {
    counter!(
        "vrf_worker_task_runs_total",
        "task" => task.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "vrf_worker_task_duration_seconds",
        "task" => task.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_task_cadence(task: &str, cadence: Duration) {
    histogram!(
        "vrf_worker_task_cadence_seconds",
        "task" => task.to_string()
    )
    .record(cadence.as_secs_f64());
}

/// Outcome of a single fulfillment iteration: `fulfilled`, `idle`, `rejected` or `failed`.
pub fn record_fulfillment_outcome(outcome: &str) {
    counter!(
        "vrf_worker_fulfillment_outcome_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
