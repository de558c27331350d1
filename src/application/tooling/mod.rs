mod error;
mod interface;
mod process;
mod session;

pub use error::ToolInvokeError;
pub use interface::{ServerToolInfo, ToolCallOutcome, ToolServerInterface};
pub use process::McpProcess;
pub use session::{InitializeResult, McpSession, PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS};
