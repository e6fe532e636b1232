use std::time::Instant;

use alloy::{
    contract::Error as ContractError,
    network::ReceiptResponse,
    primitives::{Address, U256},
    signers::local::PrivateKeySigner,
};
use tokio::sync::Mutex;

use crate::{
    BlockchainConfig,
    error::BlockchainError,
    events::decode_receipt_events,
    ledger::{Fulfillment, FulfillmentBatch, FulfillmentReceipt, VrfLedger},
    rpc_executor::{RetryPolicy, execute_with_retry},
};

mod contracts;
mod error_decode;
mod provider;
mod wallets;

pub use contracts::NativeVRF;
use error_decode::decode_contract_error;
pub use provider::{BlockchainProvider, initialize_provider_with_wallet};
pub use wallets::signer_from_private_key;

const GAS_ESTIMATE_MULTIPLIER: f64 = 1.2;

/// [`VrfLedger`] backed by a deployed NativeVRF contract.
pub struct EvmVrfLedger {
    config: BlockchainConfig,
    contract: NativeVRF::NativeVRFInstance<BlockchainProvider>,
    rpc_retry_policy: RetryPolicy,
    tx_mutex: Mutex<()>,
}

impl EvmVrfLedger {
    /// Connect to the contract named in `config`, sending transactions from `signer`.
    pub async fn connect(
        config: BlockchainConfig,
        signer: PrivateKeySigner,
    ) -> Result<Self, BlockchainError> {
        let sender = signer.address();
        let provider = initialize_provider_with_wallet(
            config.rpc_endpoints(),
            wallets::wallet_from_signer(signer),
        )
        .await?;

        let contract = NativeVRF::new(config.contract_address(), provider);

        tracing::info!(
            contract = %config.contract_address(),
            sender = %sender,
            "Connected to NativeVRF contract"
        );

        Ok(Self {
            config,
            contract,
            rpc_retry_policy: RetryPolicy::rpc_default(),
            tx_mutex: Mutex::new(()),
        })
    }

    pub fn contract_address(&self) -> Address {
        *self.contract.address()
    }

    /// Run a read call with retries on transient transport failures.
    async fn rpc_call<T, F, O>(&self, operation: &'static str, call: F) -> Result<T, BlockchainError>
    where
        F: FnMut() -> O,
        O: std::future::IntoFuture<Output = Result<T, ContractError>>,
    {
        let started = Instant::now();
        let result = execute_with_retry(&self.rpc_retry_policy, operation, call).await;
        let status = if result.is_ok() { "success" } else { "error" };
        vrf_observability::record_ledger_call(operation, status, started.elapsed());

        result.map_err(BlockchainError::from)
    }

    async fn submit(&self, batch: FulfillmentBatch) -> Result<FulfillmentReceipt, BlockchainError> {
        let _guard = self.tx_mutex.lock().await;

        let call = self
            .contract
            .fulfillRandomness(batch.request_ids, batch.inputs, batch.signatures);

        let call_ref = &call;
        let estimate = execute_with_retry(&self.rpc_retry_policy, "estimate_gas", move || {
            call_ref.estimate_gas()
        })
        .await
        .map_err(classify_submission_error)?;

        let call = call.gas(apply_gas_estimate_multiplier(estimate));
        let pending = call.send().await.map_err(classify_submission_error)?;
        let transaction_hash = *pending.tx_hash();

        tracing::info!(
            transaction_hash = %transaction_hash,
            gas_limit = apply_gas_estimate_multiplier(estimate),
            "Submitted fulfillment transaction"
        );

        let receipt = pending
            .with_required_confirmations(self.config.tx_confirmations())
            .with_timeout(self.config.tx_receipt_timeout())
            .get_receipt()
            .await
            .map_err(|err| {
                tracing::error!(transaction_hash = %transaction_hash, error = %err, "Failed to retrieve transaction receipt");
                BlockchainError::ReceiptFailed {
                    reason: err.to_string(),
                }
            })?;

        if !receipt.status() {
            return Err(BlockchainError::TransactionReverted {
                transaction_hash: transaction_hash.to_string(),
            });
        }

        Ok(FulfillmentReceipt {
            transaction_hash,
            block_number: receipt.block_number,
            events: decode_receipt_events(self.contract_address(), receipt.inner.logs()),
        })
    }
}

impl VrfLedger for EvmVrfLedger {
    async fn current_request_id(&self) -> Result<U256, BlockchainError> {
        let contract = &self.contract;
        self.rpc_call("current_request_id", move || async move {
            contract.currentRequestId().call().await
        })
        .await
    }

    async fn latest_fulfill_id(&self) -> Result<U256, BlockchainError> {
        let contract = &self.contract;
        self.rpc_call("latest_fulfill_id", move || async move {
            contract.latestFulfillId().call().await
        })
        .await
    }

    async fn random_result(&self, request_id: U256) -> Result<U256, BlockchainError> {
        let contract = &self.contract;
        self.rpc_call("random_results", move || async move {
            contract.randomResults(request_id).call().await
        })
        .await
    }

    async fn difficulty(&self) -> Result<U256, BlockchainError> {
        let contract = &self.contract;
        self.rpc_call("difficulty", move || async move {
            contract.difficulty().call().await
        })
        .await
    }

    async fn fulfill_randomness(
        &self,
        fulfillments: &[Fulfillment],
    ) -> Result<FulfillmentReceipt, BlockchainError> {
        let batch = FulfillmentBatch::encode(fulfillments)?;

        let started = Instant::now();
        let result = self.submit(batch).await;
        let status = match &result {
            Ok(_) => "success",
            Err(err) if err.is_rejection() => "rejected",
            Err(_) => "error",
        };
        vrf_observability::record_ledger_call("fulfill_randomness", status, started.elapsed());

        result
    }
}

/// A revert means the ledger refused the batch; anything else is a transport
/// or node failure.
fn classify_submission_error(err: ContractError) -> BlockchainError {
    match decode_contract_error(&err) {
        Some(reason) => BlockchainError::SubmissionRejected { reason },
        None => BlockchainError::Contract(err),
    }
}

fn apply_gas_estimate_multiplier(estimate: u64) -> u64 {
    if estimate == 0 {
        return 0;
    }

    let scaled = (estimate as f64 * GAS_ESTIMATE_MULTIPLIER).ceil();
    if !scaled.is_finite() || scaled <= 0.0 {
        return estimate;
    }

    let scaled = scaled.min(u64::MAX as f64) as u64;
    scaled.max(estimate)
}
