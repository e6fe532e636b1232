use std::path::Path;

use clap::{Arg, Command};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};

use super::{Config, ConfigRaw, defaults};
use crate::{
    config::ConfigError,
    periodic_tasks::tasks::fulfill_randomness::DEFAULT_FULFILLMENT_DELAY_MS,
};

/// Environment variables that override file configuration, with the config
/// key each one lands on.
const ENV_OVERRIDES: [(&str, &str); 3] = [
    ("RPC_URL", "blockchain.rpc_url"),
    ("VRF_CONTRACT_ADDRESS", "blockchain.vrf_contract_address"),
    ("PRIVATE_KEY", "blockchain.private_key"),
];

const DELAY_TIME_ENV: &str = "DELAY_TIME";

pub(crate) fn load_configuration() -> Result<Config, ConfigError> {
    let matches = Command::new("native-vrf-worker")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fulfills NativeVRF randomness requests with proof-of-work solutions")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.toml format)"),
        )
        .get_matches();

    let custom_config_path = matches.get_one::<String>("config").map(String::as_str);

    // Build configuration with layered sources (priority: lowest to highest)
    let mut figment = Figment::from(Serialized::defaults(defaults::config()));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if let Some(config_path) = custom_config_path {
        if !Path::new(config_path).exists() {
            return Err(ConfigError::MissingConfig(config_path.to_string()));
        }
        figment = figment.merge(Toml::file(config_path));
    }

    let figment = apply_env_overrides(figment, |key| std::env::var(key).ok());

    resolve(figment)
}

fn resolve(figment: Figment) -> Result<Config, ConfigError> {
    let config: ConfigRaw = figment.extract().map_err(Box::new)?;
    config.resolve()
}

/// Layer worker environment variables on top of `figment`.
///
/// Unset or blank variables leave the underlying value alone. A `DELAY_TIME`
/// without leading digits falls back to the default delay.
fn apply_env_overrides<F>(mut figment: Figment, lookup: F) -> Figment
where
    F: Fn(&str) -> Option<String>,
{
    let present = |name: &str| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    for (env_name, key) in ENV_OVERRIDES {
        if let Some(value) = present(env_name) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }

    if let Some(value) = present(DELAY_TIME_ENV) {
        let delay_ms = parse_delay_ms(&value).unwrap_or_else(|| {
            tracing::warn!(
                value = %value,
                default_ms = DEFAULT_FULFILLMENT_DELAY_MS,
                "DELAY_TIME is not a number of milliseconds; using the default"
            );
            DEFAULT_FULFILLMENT_DELAY_MS
        });
        figment = figment.merge(Serialized::default("fulfill_randomness.delay_ms", delay_ms));
    }

    figment
}

/// Leading decimal digits of `value`, so `"2500ms"` reads as 2500. `None`
/// when there are none or they overflow.
fn parse_delay_ms(value: &str) -> Option<u64> {
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}
