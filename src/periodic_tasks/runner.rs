use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

/// Call `run_once` forever, sleeping for the delay it returns between calls.
///
/// Cancellation is only observed while sleeping, so an iteration that has
/// started always runs to completion.
pub(crate) async fn run_with_shutdown<F, Fut>(
    task_name: &'static str,
    shutdown: CancellationToken,
    mut run_once: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Duration>,
{
    let mut last_started: Option<tokio::time::Instant> = None;

    loop {
        let started = tokio::time::Instant::now();
        if let Some(previous) = last_started {
            vrf_observability::record_task_cadence(task_name, started - previous);
        }
        last_started = Some(started);

        let delay = run_once().await;
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.cancelled() => {
                tracing::info!(task = task_name, "Periodic task shutting down");
                break;
            }
        }
    }
}
