use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("temperature must be between 0.0 and 2.0, got {value}")]
    InvalidTemperature { value: f32 },

    #[error("recursion_limit must be at least 1")]
    InvalidRecursionLimit,
}
