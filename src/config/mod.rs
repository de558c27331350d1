pub mod app;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod provider;
pub mod server;

/// Default config file path - can be overridden via CLI argument
pub const CONFIG_PATH: &str = defaults::DEFAULT_CONFIG_PATH;

pub use app::AppConfig;
pub use error::ConfigError;
pub use loader::ensure_env_loaded;
pub use provider::AzureOpenAIConfig;
pub use server::ServerConfig;
