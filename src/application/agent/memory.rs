use crate::types::ChatMessage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Snapshot of a thread's messages after one agent step.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub id: Uuid,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

#[async_trait]
pub trait Checkpointer: Send + Sync {
    async fn latest(&self, thread_id: &str) -> Option<Checkpoint>;

    async fn put(&self, thread_id: &str, messages: Vec<ChatMessage>) -> Checkpoint;

    /// All checkpoints of a thread, oldest first.
    async fn list(&self, thread_id: &str) -> Vec<Checkpoint>;
}

/// Process-local checkpointer; history is gone when the process exits.
#[derive(Default)]
pub struct MemorySaver {
    threads: Mutex<HashMap<String, Vec<Checkpoint>>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn latest(&self, thread_id: &str) -> Option<Checkpoint> {
        self.threads
            .lock()
            .await
            .get(thread_id)
            .and_then(|history| history.last().cloned())
    }

    async fn put(&self, thread_id: &str, messages: Vec<ChatMessage>) -> Checkpoint {
        let checkpoint = Checkpoint {
            id: Uuid::new_v4(),
            thread_id: thread_id.to_string(),
            created_at: Utc::now(),
            messages,
        };
        let mut threads = self.threads.lock().await;
        let history = threads.entry(thread_id.to_string()).or_default();
        history.push(checkpoint.clone());
        debug!(
            thread_id,
            checkpoints = history.len(),
            total_messages = checkpoint.messages.len(),
            "Saved checkpoint"
        );
        checkpoint
    }

    async fn list(&self, thread_id: &str) -> Vec<Checkpoint> {
        self.threads
            .lock()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }
}
