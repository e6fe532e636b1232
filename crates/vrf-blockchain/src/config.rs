use std::time::Duration;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Ledger connection settings as loaded, before validation.
///
/// **Secret handling**: the endpoint, contract address and private key are
/// normally supplied through the `RPC_URL`, `VRF_CONTRACT_ADDRESS` and
/// `PRIVATE_KEY` environment variables rather than the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockchainConfigRaw {
    /// One RPC endpoint or a comma-separated list (HTTP or WebSocket).
    /// Multiple endpoints enable fallback if the primary fails.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Address of the deployed NativeVRF contract.
    #[serde(default)]
    pub vrf_contract_address: Option<String>,

    /// Private key of the worker wallet; signs challenges and pays for fulfillments.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Number of confirmations to wait for when fetching transaction receipts.
    #[serde(default = "default_tx_confirmations")]
    pub tx_confirmations: u64,

    /// Timeout for waiting on transaction receipts in milliseconds.
    /// Set to 0 to disable the timeout.
    #[serde(default = "default_tx_receipt_timeout_ms")]
    pub tx_receipt_timeout_ms: u64,
}

fn default_tx_confirmations() -> u64 {
    1
}

fn default_tx_receipt_timeout_ms() -> u64 {
    60_000
}

impl Default for BlockchainConfigRaw {
    fn default() -> Self {
        Self {
            rpc_url: None,
            vrf_contract_address: None,
            private_key: None,
            tx_confirmations: default_tx_confirmations(),
            tx_receipt_timeout_ms: default_tx_receipt_timeout_ms(),
        }
    }
}

impl BlockchainConfigRaw {
    /// Ensures at least one RPC endpoint is configured.
    pub fn ensure_rpc_url(&self) -> Result<Vec<String>, ConfigError> {
        let endpoints = self
            .rpc_url
            .as_deref()
            .map(split_endpoints)
            .unwrap_or_default();

        if endpoints.is_empty() {
            return Err(ConfigError::MissingSecret(
                "RPC_URL env var or blockchain.rpc_url config required".to_string(),
            ));
        }
        Ok(endpoints)
    }

    /// Ensures the contract address is set and is a valid EVM address.
    pub fn ensure_vrf_contract_address(&self) -> Result<Address, ConfigError> {
        let address = non_empty(self.vrf_contract_address.as_deref()).ok_or_else(|| {
            ConfigError::MissingSecret(
                "VRF_CONTRACT_ADDRESS env var or blockchain.vrf_contract_address config required"
                    .to_string(),
            )
        })?;
        parse_evm_address(address)
    }

    /// Ensures the private key is set and parses as a secp256k1 key.
    pub fn ensure_private_key(&self) -> Result<String, ConfigError> {
        let key = non_empty(self.private_key.as_deref()).ok_or_else(|| {
            ConfigError::MissingSecret(
                "PRIVATE_KEY env var or blockchain.private_key config required".to_string(),
            )
        })?;
        key.parse::<PrivateKeySigner>()
            .map_err(|e| ConfigError::InvalidConfig(format!("invalid private key: {}", e)))?;
        Ok(key.to_string())
    }

    pub fn resolve(self) -> Result<BlockchainConfig, ConfigError> {
        let rpc_endpoints = self.ensure_rpc_url()?;
        let contract_address = self.ensure_vrf_contract_address()?;
        let private_key = self.ensure_private_key()?;

        Ok(BlockchainConfig {
            rpc_endpoints,
            contract_address,
            private_key,
            tx_confirmations: self.tx_confirmations,
            tx_receipt_timeout_ms: self.tx_receipt_timeout_ms,
        })
    }
}

#[derive(Clone)]
pub struct BlockchainConfig {
    rpc_endpoints: Vec<String>,
    contract_address: Address,
    private_key: String,
    tx_confirmations: u64,
    tx_receipt_timeout_ms: u64,
}

impl std::fmt::Debug for BlockchainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainConfig")
            .field("rpc_endpoints", &self.rpc_endpoints)
            .field("contract_address", &self.contract_address)
            .field("private_key", &"<redacted>")
            .field("tx_confirmations", &self.tx_confirmations)
            .field("tx_receipt_timeout_ms", &self.tx_receipt_timeout_ms)
            .finish()
    }
}

impl BlockchainConfig {
    pub fn rpc_endpoints(&self) -> &[String] {
        &self.rpc_endpoints
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn tx_confirmations(&self) -> u64 {
        self.tx_confirmations
    }

    pub fn tx_receipt_timeout(&self) -> Option<Duration> {
        if self.tx_receipt_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.tx_receipt_timeout_ms))
        }
    }
}

fn split_endpoints(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_evm_address(value: &str) -> Result<Address, ConfigError> {
    value
        .parse::<Address>()
        .map_err(|e| ConfigError::InvalidConfig(format!("invalid EVM address '{}': {}", value, e)))
}
