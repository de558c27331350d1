//! Model client implementations

pub mod azure;
pub mod base;

pub use azure::AzureOpenAIClient;
pub use base::HttpClientBase;
