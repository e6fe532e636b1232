use serde::{Deserialize, Serialize};
use vrf_blockchain::{BlockchainConfig, BlockchainConfigRaw};

use crate::{
    config::ConfigError,
    logger::{LoggerConfig, TelemetryConfig},
    periodic_tasks::tasks::fulfill_randomness::{FulfillRandomnessConfig, FulfillRandomnessConfigRaw},
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub blockchain: BlockchainConfigRaw,
    pub fulfill_randomness: FulfillRandomnessConfigRaw,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub blockchain: BlockchainConfig,
    pub fulfill_randomness: FulfillRandomnessConfig,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        Ok(Config {
            blockchain: self.blockchain.resolve()?,
            fulfill_randomness: self.fulfill_randomness.resolve(),
            logger: self.logger,
            telemetry: self.telemetry,
        })
    }
}
