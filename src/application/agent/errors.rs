use crate::application::tooling::ToolInvokeError;
use crate::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("agent exceeded the recursion limit of {limit} steps without a final answer")]
    RecursionLimit { limit: usize },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{tool}' reported an error: {message}")]
    Failed { tool: String, message: String },
    #[error("failed to execute tool '{tool}': {source}")]
    Invoke {
        tool: String,
        #[source]
        source: ToolInvokeError,
    },
}
