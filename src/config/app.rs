use super::defaults::{DEFAULT_RECURSION_LIMIT, DEFAULT_SYSTEM_PROMPT, DEFAULT_THREAD_ID};
use super::error::ConfigError;
use super::provider::AzureOpenAIConfig;
use super::server::ServerConfig;
use std::path::Path;

/// Application configuration: built-in defaults, optionally overridden by
/// `client.toml`, with model credentials taken from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model: AzureOpenAIConfig,
    pub server: ServerConfig,
    pub system_prompt: String,
    pub thread_id: String,
    pub recursion_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: AzureOpenAIConfig::default(),
            server: ServerConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            thread_id: DEFAULT_THREAD_ID.to_string(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }
}
