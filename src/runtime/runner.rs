use tokio::{select, signal::unix::SignalKind};
use tokio_util::sync::CancellationToken;
use vrf_blockchain::VrfLedger;
use vrf_pow::ChallengeSigner;

use super::shutdown;
use crate::{
    error::WorkerError,
    periodic_tasks::{self, tasks::fulfill_randomness::FulfillRandomnessTask},
};

/// Run the worker until SIGINT or SIGTERM, then shut down gracefully.
pub(crate) async fn run<L, S>(
    fulfill_randomness: FulfillRandomnessTask<L, S>,
) -> Result<(), WorkerError>
where
    L: VrfLedger + 'static,
    S: ChallengeSigner + 'static,
{
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;

    let periodic_shutdown = CancellationToken::new();
    let periodic_handle = tokio::task::spawn(periodic_tasks::run_all(
        fulfill_randomness,
        periodic_shutdown.clone(),
    ));

    select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Received SIGINT, initiating shutdown...");
        }
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating shutdown..."),
    }

    shutdown::graceful_shutdown(shutdown::ShutdownContext {
        periodic_shutdown,
        periodic_handle,
    })
    .await;

    Ok(())
}
