mod task;

use std::time::Duration;

use serde::{Deserialize, Serialize};
pub(crate) use task::FulfillRandomnessTask;

/// Pause between polling iterations when nothing else is configured.
pub(crate) const DEFAULT_FULFILLMENT_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FulfillRandomnessConfigRaw {
    /// Delay after each iteration in milliseconds; 0 selects the default.
    pub delay_ms: u64,
}

impl FulfillRandomnessConfigRaw {
    pub(crate) fn resolve(self) -> FulfillRandomnessConfig {
        let delay_ms = if self.delay_ms == 0 {
            DEFAULT_FULFILLMENT_DELAY_MS
        } else {
            self.delay_ms
        };

        FulfillRandomnessConfig {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FulfillRandomnessConfig {
    pub delay: Duration,
}
