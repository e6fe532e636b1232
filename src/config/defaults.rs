//! Typed default configuration.
//!
//! Every tunable has a value here so an empty environment plus the three
//! required secrets is a complete configuration.

use vrf_blockchain::BlockchainConfigRaw;

use super::ConfigRaw;
use crate::{
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
    periodic_tasks::tasks::fulfill_randomness::{
        DEFAULT_FULFILLMENT_DELAY_MS, FulfillRandomnessConfigRaw,
    },
};

pub(crate) fn config() -> ConfigRaw {
    ConfigRaw {
        blockchain: BlockchainConfigRaw::default(),
        fulfill_randomness: FulfillRandomnessConfigRaw {
            delay_ms: DEFAULT_FULFILLMENT_DELAY_MS,
        },
        logger: LoggerConfig {
            level: "native_vrf_worker=info,vrf_pow=info,vrf_blockchain=info,warn".to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: TelemetryConfig {
            metrics: TelemetryMetricsConfig {
                enabled: false,
                bind_address: "127.0.0.1:9464".to_string(),
            },
        },
    }
}
