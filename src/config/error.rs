use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] Box<figment::Error>),

    #[error("Missing required secret: {0}")]
    MissingSecret(String),

    #[error("Missing required config file: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<vrf_blockchain::ConfigError> for ConfigError {
    fn from(err: vrf_blockchain::ConfigError) -> Self {
        match err {
            vrf_blockchain::ConfigError::MissingSecret(msg) => Self::MissingSecret(msg),
            vrf_blockchain::ConfigError::InvalidConfig(msg) => Self::InvalidConfig(msg),
        }
    }
}
