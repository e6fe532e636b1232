use alloy::primitives::{Address, U256};

#[derive(Debug, thiserror::Error)]
pub enum PowError {
    #[error("Difficulty must be greater than zero")]
    ZeroDifficulty,

    #[error("Signing challenge failed: {0}")]
    Signer(#[from] SignerError),

    #[error("Malformed signature: {reason}")]
    MalformedSignature { reason: String },

    #[error("Signature was produced by {recovered}, expected {expected}")]
    SignerMismatch { expected: Address, recovered: Address },

    #[error("Signature value is not divisible by difficulty {difficulty}")]
    InsufficientWork { difficulty: U256 },
}

/// Failure reported by a [`crate::ChallengeSigner`] backend.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct SignerError {
    reason: String,
}

impl SignerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
