use super::errors::AgentError;
use super::memory::Checkpointer;
use super::models::{AgentState, RunConfig};
use super::runtime::ToolRuntime;
use crate::application::tooling::{ServerToolInfo, ToolServerInterface};
use crate::model::{ModelProvider, ModelRequest};
use crate::types::ChatMessage;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point the interaction loop drives: one call per user turn.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(
        &self,
        input: Vec<ChatMessage>,
        config: &RunConfig,
    ) -> Result<AgentState, AgentError>;
}

pub struct Agent<P: ModelProvider> {
    provider: P,
    runtime: ToolRuntime,
    prompt: String,
    checkpointer: Arc<dyn Checkpointer>,
}

impl<P: ModelProvider> Agent<P> {
    pub fn new(
        provider: P,
        tools: Vec<ServerToolInfo>,
        bridge: Arc<dyn ToolServerInterface>,
        prompt: impl Into<String>,
        checkpointer: Arc<dyn Checkpointer>,
    ) -> Self {
        Self {
            provider,
            runtime: ToolRuntime::new(tools, bridge),
            prompt: prompt.into(),
            checkpointer,
        }
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.runtime.names()
    }

    fn model_request(&self, thread: &[ChatMessage]) -> ModelRequest {
        let mut messages = Vec::with_capacity(thread.len() + 1);
        if !self.prompt.trim().is_empty() {
            messages.push(ChatMessage::system(self.prompt.clone()));
        }
        messages.extend(thread.iter().cloned());
        ModelRequest {
            messages,
            tools: self.runtime.specs(),
        }
    }
}

#[async_trait]
impl<P: ModelProvider> AgentInvoker for Agent<P> {
    async fn invoke(
        &self,
        input: Vec<ChatMessage>,
        config: &RunConfig,
    ) -> Result<AgentState, AgentError> {
        let thread_id = config.thread_id.as_str();
        let mut messages = self
            .checkpointer
            .latest(thread_id)
            .await
            .map(|checkpoint| checkpoint.messages)
            .unwrap_or_default();
        debug!(
            thread_id,
            history_count = messages.len(),
            "Loaded thread history"
        );
        messages.extend(input);
        self.checkpointer.put(thread_id, messages.clone()).await;

        let limit = config.recursion_limit;
        let mut steps = 0usize;
        loop {
            steps += 1;
            if steps > limit {
                warn!(thread_id, limit, "Agent exceeded recursion limit");
                return Err(AgentError::RecursionLimit { limit });
            }

            let response = self.provider.chat(self.model_request(&messages)).await?;
            let reply = response.message;
            let calls = reply.tool_calls.clone();
            messages.push(reply);
            self.checkpointer.put(thread_id, messages.clone()).await;

            if calls.is_empty() {
                info!(thread_id, steps, "Agent returned final response");
                return Ok(AgentState { messages });
            }

            steps += 1;
            if steps > limit {
                warn!(thread_id, limit, "Agent exceeded recursion limit");
                return Err(AgentError::RecursionLimit { limit });
            }

            info!(thread_id, calls = calls.len(), "Model requested tool execution");
            for call in &calls {
                let result = self.runtime.execute(call).await?;
                messages.push(result);
            }
            self.checkpointer.put(thread_id, messages.clone()).await;
        }
    }
}
