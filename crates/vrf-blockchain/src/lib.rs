//! Ledger access for the randomness worker: NativeVRF contract bindings,
//! provider construction, retrying reads, fulfillment submission and receipt
//! event decoding.

mod chains;
mod config;
mod config_error;
mod error;
mod error_classification;
mod events;
mod ledger;
mod rpc_executor;

pub use chains::evm::{
    BlockchainProvider, EvmVrfLedger, NativeVRF, initialize_provider_with_wallet,
    signer_from_private_key,
};
pub use config::{BlockchainConfig, BlockchainConfigRaw};
pub use config_error::ConfigError;
pub use error::BlockchainError;
pub use events::{ReceiptEvent, decode_receipt_events};
pub use ledger::{Fulfillment, FulfillmentBatch, FulfillmentReceipt, VrfLedger};
pub use rpc_executor::{RetryPolicy, RetryableError, backoff_delay, execute_with_retry};

pub use alloy::{
    primitives::{Address, B256, Bytes, U256},
    rpc::types::Log,
    signers::local::PrivateKeySigner,
};
