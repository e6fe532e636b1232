use std::sync::Arc;

use vrf_blockchain::{EvmVrfLedger, PrivateKeySigner};

use crate::{
    config::Config, error::WorkerError,
    periodic_tasks::tasks::fulfill_randomness::FulfillRandomnessTask,
};

pub(crate) type WorkerTask = FulfillRandomnessTask<EvmVrfLedger, PrivateKeySigner>;

/// Connect to the ledger and assemble the fulfillment task.
///
/// Fails when no RPC endpoint can be reached; the worker does not start
/// without a ledger.
pub(crate) async fn build_worker(
    config: &Config,
    signer: PrivateKeySigner,
) -> Result<WorkerTask, WorkerError> {
    let ledger = EvmVrfLedger::connect(config.blockchain.clone(), signer.clone()).await?;

    Ok(FulfillRandomnessTask::new(
        Arc::new(ledger),
        Arc::new(signer),
        config.fulfill_randomness.clone(),
    ))
}
