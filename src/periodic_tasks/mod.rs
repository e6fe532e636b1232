mod runner;
pub(crate) mod tasks;

use tasks::fulfill_randomness::FulfillRandomnessTask;
use tokio_util::sync::CancellationToken;
use vrf_blockchain::VrfLedger;
use vrf_pow::ChallengeSigner;

/// Spawn all periodic tasks and wait for them to complete.
///
/// Uses `JoinSet` so a panicking task is logged as soon as it happens. The
/// fulfillment task is the worker's only loop, so a panic restarts it after
/// its regular delay instead of leaving the process idle. Under normal
/// operation tasks only exit during shutdown.
pub(crate) async fn run_all<L, S>(
    fulfill_randomness: FulfillRandomnessTask<L, S>,
    shutdown: CancellationToken,
) where
    L: VrfLedger + 'static,
    S: ChallengeSigner + 'static,
{
    let mut set = tokio::task::JoinSet::new();

    set.spawn(fulfill_randomness.clone().run(shutdown.clone()));

    while let Some(result) = set.join_next().await {
        match result {
            Ok(()) => {}
            Err(error) if error.is_panic() && !shutdown.is_cancelled() => {
                let delay = fulfill_randomness.delay();
                tracing::error!(
                    error = ?error,
                    restart_in_ms = delay.as_millis(),
                    "Periodic task panicked; restarting"
                );
                set.spawn(restart_after(
                    fulfill_randomness.clone(),
                    shutdown.clone(),
                ));
            }
            Err(error) if error.is_panic() => {
                tracing::error!(error = ?error, "Periodic task panicked during shutdown");
            }
            Err(error) => {
                tracing::warn!(error = ?error, "Periodic task cancelled");
            }
        }
    }
}

async fn restart_after<L, S>(task: FulfillRandomnessTask<L, S>, shutdown: CancellationToken)
where
    L: VrfLedger + 'static,
    S: ChallengeSigner + 'static,
{
    let cancelled = shutdown.clone();
    tokio::select! {
        _ = tokio::time::sleep(task.delay()) => task.run(shutdown).await,
        _ = cancelled.cancelled() => {}
    }
}
