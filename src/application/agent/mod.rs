//! # Agent Module
//!
//! A tool-calling agent: the model sees the system prompt, the thread's
//! history and the MCP tools, and either answers or asks for tool calls.
//! Tool results are fed back until the model answers without calling any
//! tool.
//!
//! ## Key Types
//!
//! - [`Agent`] - The agent executor
//! - [`AgentInvoker`] - Invocation entry point used by the interaction loop
//! - [`RunConfig`] - Thread identity and step budget for one invocation
//! - [`AgentState`] - Messages of the thread after an invocation
//! - [`Checkpointer`] / [`MemorySaver`] - Per-thread message history
//!
//! ## Agent Loop
//!
//! 1. Load the thread's latest checkpoint and append the new input
//! 2. Send system prompt + thread + tool specs to the model
//! 3. If tool calls were requested, execute them in order and continue
//! 4. Otherwise return the thread

mod errors;
mod memory;
mod models;
mod runner;
mod runtime;


pub use errors::{AgentError, ToolError};
pub use memory::{Checkpoint, Checkpointer, MemorySaver};
pub use models::{AgentState, RunConfig};
pub use runner::{Agent, AgentInvoker};
pub(crate) use runtime::ToolRuntime;
