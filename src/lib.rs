//! Native VRF fulfillment worker.
//!
//! Polls the NativeVRF contract for unfulfilled randomness requests, solves
//! the proof-of-work for the next one with the configured key and submits it.

mod bootstrap;
mod config;
mod error;
mod logger;
mod periodic_tasks;
mod runtime;

use alloy::primitives::Address;
pub use error::WorkerError;
use vrf_blockchain::signer_from_private_key;

pub async fn run() -> Result<(), WorkerError> {
    dotenvy::dotenv().ok();

    let config = config::load_configuration()?;
    logger::initialize(&config.logger, &config.telemetry);

    let signer = signer_from_private_key(config.blockchain.private_key())?;
    display_banner(signer.address(), &config);

    let worker = bootstrap::build_worker(&config, signer).await?;

    runtime::run(worker).await
}

fn display_banner(worker: Address, config: &config::Config) {
    tracing::info!("======================================================");
    tracing::info!(
        "             Native VRF Worker v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("======================================================");
    tracing::info!(
        worker = %worker,
        contract = %config.blockchain.contract_address(),
        delay_ms = config.fulfill_randomness.delay.as_millis(),
        "Worker configured"
    );
}
