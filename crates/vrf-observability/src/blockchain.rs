use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub fn record_ledger_call(operation: &str, status: &str, duration: Duration) {
    counter!(
        "vrf_worker_ledger_calls_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "vrf_worker_ledger_call_duration_seconds",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_ledger_retry(operation: &str) {
    counter!(
        "vrf_worker_ledger_retries_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Snapshot of the ledger cursor observed at the start of an iteration.
pub fn record_request_cursor(current_request_id: f64, latest_fulfill_id: f64) {
    gauge!("vrf_worker_current_request_id").set(current_request_id);
    gauge!("vrf_worker_latest_fulfill_id").set(latest_fulfill_id);
    gauge!("vrf_worker_pending_requests").set((current_request_id - latest_fulfill_id - 1.0).max(0.0));
}
