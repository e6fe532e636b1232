use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Upper bound for an in-flight iteration (solve plus confirmation) to finish.
const PERIODIC_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

pub(super) struct ShutdownContext {
    pub(super) periodic_shutdown: CancellationToken,
    pub(super) periodic_handle: JoinHandle<()>,
}

pub(super) async fn graceful_shutdown(context: ShutdownContext) {
    let ShutdownContext {
        periodic_shutdown,
        mut periodic_handle,
    } = context;

    tracing::info!("Shutting down gracefully...");

    // Tasks observe the token between iterations, so a running fulfillment
    // is allowed to reach its receipt.
    periodic_shutdown.cancel();

    wait_for_shutdown_task(
        "periodic_tasks",
        PERIODIC_SHUTDOWN_TIMEOUT,
        &mut periodic_handle,
    )
    .await;

    tracing::info!("Shutdown complete");
}

async fn wait_for_shutdown_task(task: &str, timeout: Duration, handle: &mut JoinHandle<()>) {
    match tokio::time::timeout(timeout, &mut *handle).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => tracing::error!(
            task,
            error = ?error,
            "Shutdown task panicked"
        ),
        Err(_) => {
            tracing::warn!(
                task,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout reached, aborting task"
            );
            handle.abort();
            let _ = handle.await;
        }
    }
}
