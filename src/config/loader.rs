use super::CONFIG_PATH;
use super::app::AppConfig;
use super::defaults::DEFAULT_ENV_PATH;
use super::error::ConfigError;
use super::provider::{AzureOpenAIConfig, RawModelConfig};
use super::server::{RawServer, ServerConfig};
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub system_prompt: Option<String>,
    pub thread_id: Option<String>,
    pub recursion_limit: Option<usize>,
    pub model: Option<RawModelConfig>,
    pub server: Option<RawServer>,
}

/// Ensures environment variables are loaded from `.env`.
///
/// Variables already present in the process environment win.
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        if let Err(err) = from_filename(DEFAULT_ENV_PATH) {
            debug!(%err, "No .env file loaded");
        }
    });
}

/// Load configuration. An explicit path must exist; the default path is
/// optional and falls back to built-in values.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let raw = match path {
        Some(path) => read_config(path)?,
        None => {
            let default_path = Path::new(CONFIG_PATH);
            match read_config(default_path) {
                Err(ConfigError::NotFound { .. }) => {
                    debug!(path = %default_path.display(), "No configuration file, using defaults");
                    RawConfig::default()
                }
                other => other?,
            }
        }
    };

    let mut config = build(raw)?;
    config.model = config.model.with_env();
    Ok(config)
}

fn read_config(path: &Path) -> Result<RawConfig, ConfigError> {
    debug!(path = %path.display(), "Reading client configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn build(raw: RawConfig) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();

    let model = raw
        .model
        .map(AzureOpenAIConfig::from)
        .unwrap_or(defaults.model);
    if !(0.0..=2.0).contains(&model.temperature) {
        return Err(ConfigError::InvalidTemperature {
            value: model.temperature,
        });
    }

    let recursion_limit = raw.recursion_limit.unwrap_or(defaults.recursion_limit);
    if recursion_limit == 0 {
        return Err(ConfigError::InvalidRecursionLimit);
    }

    Ok(AppConfig {
        model,
        server: raw.server.map(ServerConfig::from).unwrap_or(defaults.server),
        system_prompt: raw.system_prompt.unwrap_or(defaults.system_prompt),
        thread_id: raw.thread_id.unwrap_or(defaults.thread_id),
        recursion_limit,
    })
}
