use std::{collections::HashSet, future::Future};

use alloy::primitives::{B256, Bytes, U256};

use crate::{error::BlockchainError, events::ReceiptEvent};

/// One winning proof-of-work solution for a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fulfillment {
    pub request_id: U256,
    pub input: U256,
    pub signature: Bytes,
}

/// Confirmed fulfillment transaction.
#[derive(Debug, PartialEq, Eq)]
pub struct FulfillmentReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub events: Vec<ReceiptEvent>,
}

/// Read and write access to the randomness ledger.
///
/// Reads are cheap view calls. `fulfill_randomness` submits a transaction and
/// resolves once it is confirmed; a ledger refusal (for example a request
/// already claimed by another worker) surfaces as
/// [`BlockchainError::SubmissionRejected`] or
/// [`BlockchainError::TransactionReverted`].
pub trait VrfLedger: Send + Sync {
    /// Id the next randomness request will receive.
    fn current_request_id(&self) -> impl Future<Output = Result<U256, BlockchainError>> + Send;

    /// Id of the most recently fulfilled request.
    fn latest_fulfill_id(&self) -> impl Future<Output = Result<U256, BlockchainError>> + Send;

    fn random_result(
        &self,
        request_id: U256,
    ) -> impl Future<Output = Result<U256, BlockchainError>> + Send;

    fn difficulty(&self) -> impl Future<Output = Result<U256, BlockchainError>> + Send;

    fn fulfill_randomness(
        &self,
        fulfillments: &[Fulfillment],
    ) -> impl Future<Output = Result<FulfillmentReceipt, BlockchainError>> + Send;
}

/// Parallel argument arrays of a `fulfillRandomness` call.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FulfillmentBatch {
    pub request_ids: Vec<U256>,
    pub inputs: Vec<U256>,
    pub signatures: Vec<Bytes>,
}

impl FulfillmentBatch {
    /// Split fulfillments into the index-aligned arrays the contract expects.
    ///
    /// Empty batches and batches naming a request twice are rejected before
    /// anything is sent.
    pub fn encode(fulfillments: &[Fulfillment]) -> Result<Self, BlockchainError> {
        if fulfillments.is_empty() {
            return Err(BlockchainError::InvalidBatch {
                reason: "at least one fulfillment is required".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(fulfillments.len());
        let mut batch = Self {
            request_ids: Vec::with_capacity(fulfillments.len()),
            inputs: Vec::with_capacity(fulfillments.len()),
            signatures: Vec::with_capacity(fulfillments.len()),
        };

        for fulfillment in fulfillments {
            if !seen.insert(fulfillment.request_id) {
                return Err(BlockchainError::InvalidBatch {
                    reason: format!("request {} appears more than once", fulfillment.request_id),
                });
            }
            batch.request_ids.push(fulfillment.request_id);
            batch.inputs.push(fulfillment.input);
            batch.signatures.push(fulfillment.signature.clone());
        }

        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.request_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.request_ids.is_empty()
    }
}
