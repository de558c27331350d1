//! Azure OpenAI chat-completions client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::AzureOpenAIConfig;
use crate::config::defaults::{ENV_API_KEY, ENV_API_VERSION, ENV_ENDPOINT};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};

const PROVIDER_ID: &str = "azure-openai";

/// Client for a single Azure OpenAI deployment.
#[derive(Clone)]
pub struct AzureOpenAIClient {
    base: HttpClientBase,
    api_key: String,
    api_version: String,
    deployment: String,
    temperature: f32,
}

impl AzureOpenAIClient {
    /// Build the client. Fails when any of the endpoint, key or API version
    /// was not provided by the environment.
    pub fn from_config(config: &AzureOpenAIConfig) -> Result<Self, ModelError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| ModelError::missing_setting(ENV_ENDPOINT))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ModelError::missing_setting(ENV_API_KEY))?;
        let api_version = config
            .api_version
            .clone()
            .ok_or_else(|| ModelError::missing_setting(ENV_API_VERSION))?;

        Ok(Self {
            base: HttpClientBase::new(
                PROVIDER_ID.to_string(),
                endpoint,
                config.timeout(),
                config.max_retries,
            )?,
            api_key,
            api_version,
            deployment: config.deployment.clone(),
            temperature: config.temperature,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    fn completions_path(&self) -> String {
        format!("openai/deployments/{}/chat/completions", self.deployment)
    }
}

#[async_trait]
impl ModelProvider for AzureOpenAIClient {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(&self.completions_path());

        let tools = MessageAdapter::tools_to_openai_format(&request.tools);
        let payload = ChatCompletionRequest {
            messages: MessageAdapter::to_openai_format(&request.messages),
            temperature: self.temperature,
            tools: (!tools.is_empty()).then_some(tools),
        };

        info!(
            provider = self.base.id.as_str(),
            deployment = self.deployment.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Azure OpenAI"
        );

        let response: ChatCompletionResponse = self
            .base
            .post_json(
                &url,
                &[("api-key", self.api_key.as_str())],
                &[("api-version", self.api_version.as_str())],
                &payload,
            )
            .await?;
        debug!("Received response from Azure OpenAI");

        let message = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing message"))?;

        Ok(ModelResponse::new(MessageAdapter::message_from_openai(
            &message,
        )))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    messages: Vec<Value>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: Option<Value>,
}
