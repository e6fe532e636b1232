use thiserror::Error;

/// Top-level worker error composing the subsystem errors.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Blockchain error: {0}")]
    Blockchain(#[from] vrf_blockchain::BlockchainError),

    #[error("Proof-of-work error: {0}")]
    ProofOfWork(#[from] vrf_pow::PowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::config::ConfigError> for WorkerError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
