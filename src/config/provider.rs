//! # Model Provider Configuration
//!
//! Settings for the Azure OpenAI deployment backing the agent. The three
//! credentials come from the process environment and are left
//! unchecked here: a missing value is reported by the model client when it
//! is constructed.
//!
//! ```toml
//! [model]
//! deployment = "OpenAIGPT4"
//! temperature = 0.2
//! max_retries = 3
//! timeout_secs = 60
//! ```

use super::defaults::{
    DEFAULT_DEPLOYMENT, DEFAULT_MAX_RETRIES, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
    ENV_API_KEY, ENV_API_VERSION, ENV_ENDPOINT,
};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct AzureOpenAIConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub api_version: Option<String>,
    pub deployment: String,
    pub temperature: f32,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for AzureOpenAIConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_version: None,
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AzureOpenAIConfig {
    /// Fill the credentials from the process environment.
    pub fn with_env(mut self) -> Self {
        self.endpoint = read_env(ENV_ENDPOINT);
        self.api_key = read_env(ENV_API_KEY);
        self.api_version = read_env(ENV_API_VERSION);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn read_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(super) struct RawModelConfig {
    pub(super) deployment: Option<String>,
    pub(super) temperature: Option<f32>,
    pub(super) max_retries: Option<u32>,
    pub(super) timeout_secs: Option<u64>,
}

impl From<RawModelConfig> for AzureOpenAIConfig {
    fn from(raw: RawModelConfig) -> Self {
        let defaults = Self::default();
        Self {
            deployment: raw.deployment.unwrap_or(defaults.deployment),
            temperature: raw.temperature.unwrap_or(defaults.temperature),
            max_retries: raw.max_retries.unwrap_or(defaults.max_retries),
            timeout_secs: raw.timeout_secs.unwrap_or(defaults.timeout_secs),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_overrides_keep_unset_defaults() {
        let raw = RawModelConfig {
            deployment: Some("gpt-4o".into()),
            temperature: None,
            max_retries: Some(5),
            timeout_secs: None,
        };
        let config = AzureOpenAIConfig::from(raw);
        assert_eq!(config.deployment, "gpt-4o");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.endpoint.is_none());
    }
}
