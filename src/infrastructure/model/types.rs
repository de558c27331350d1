//! Model types - Request, Response, and Error types

use crate::types::{ChatMessage, ToolSpec};
use reqwest::StatusCode;
use thiserror::Error;

/// Model request for LLM chat
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
}

/// Model response from LLM
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: ChatMessage,
}

impl ModelResponse {
    pub fn new(message: ChatMessage) -> Self {
        Self { message }
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing model setting: environment variable {setting} is not set")]
    MissingSetting { setting: &'static str },
    #[error("failed to build HTTP client for '{provider}': {source}")]
    Client {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: StatusCode,
        body: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn missing_setting(setting: &'static str) -> Self {
        Self::MissingSetting { setting }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn status(provider: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Whether a repeated request has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Network { source, .. } => source.is_connect() || source.is_timeout(),
            ModelError::Status { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT | StatusCode::CONFLICT | StatusCode::TOO_MANY_REQUESTS
    ) || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses() {
        for status in [408, 409, 429, 500, 502, 503] {
            let status = StatusCode::from_u16(status).expect("status");
            assert!(ModelError::status("azure", status, "").is_retryable());
        }
        for status in [400, 401, 403, 404, 422] {
            let status = StatusCode::from_u16(status).expect("status");
            assert!(!ModelError::status("azure", status, "").is_retryable());
        }
    }

    #[test]
    fn missing_setting_is_not_retryable() {
        let err = ModelError::missing_setting("AZURE_ENDPOINT_EUS");
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("AZURE_ENDPOINT_EUS"));
    }
}
