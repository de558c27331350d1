use crate::config::defaults::{DEFAULT_RECURSION_LIMIT, DEFAULT_THREAD_ID};
use crate::types::ChatMessage;

/// Per-invocation settings: which conversation the turn belongs to and how
/// many model/tool steps it may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub thread_id: String,
    pub recursion_limit: usize,
}

impl RunConfig {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_THREAD_ID)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentState {
    pub messages: Vec<ChatMessage>,
}

impl AgentState {
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
