use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_solve(status: &str, attempts: u64, duration: Duration) {
    counter!(
        "vrf_worker_pow_solves_total",
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "vrf_worker_pow_solve_attempts",
        "status" => status.to_string()
    )
    .record(attempts as f64);
    histogram!(
        "vrf_worker_pow_solve_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}
