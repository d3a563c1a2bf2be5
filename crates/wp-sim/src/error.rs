use std::path::PathBuf;

use thiserror::Error;
use wp_channel::ChannelError;
use wp_core::CoreError;
use wp_locations::LocationError;
use wp_mobility::MobilityError;

/// Startup configuration failures.  All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("location tables: {0}")]
    Locations(#[from] LocationError),

    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("[nav]: {0}")]
    Nav(#[from] MobilityError),

    #[error("server_url: {0}")]
    Channel(#[from] ChannelError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("navigation engine error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
