use alloy::{contract::Error as ContractError, signers::local::LocalSignerError};

#[derive(Debug, thiserror::Error)]
pub enum BlockchainError {
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("Invalid private key (length: {key_length})")]
    InvalidPrivateKey {
        key_length: usize,
        #[source]
        source: LocalSignerError,
    },

    #[error("RPC connection failed after trying {attempts} endpoint(s)")]
    RpcConnectionFailed { attempts: usize },

    #[error("Transaction receipt failed: {reason}")]
    ReceiptFailed { reason: String },

    #[error("Transaction {transaction_hash} reverted")]
    TransactionReverted { transaction_hash: String },

    #[error("Fulfillment rejected by ledger: {reason}")]
    SubmissionRejected { reason: String },

    #[error("Invalid fulfillment batch: {reason}")]
    InvalidBatch { reason: String },

    #[error("{0}")]
    Custom(String),
}

impl BlockchainError {
    /// True when the ledger refused the fulfillment, typically because another
    /// worker already claimed the request.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::SubmissionRejected { .. } | Self::TransactionReverted { .. }
        )
    }
}
