//! Per-thread message checkpoints on top of a key/value [`StoragePort`].
//!
//! Key layout: `thread:<thread_id>` → JSON [`ThreadCheckpoint`].

use std::rc::Rc;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use chat_core::ports::{ConversationStorePort, StoragePort};
use chat_types::{Result, ThreadId, message::Message};

const THREAD_KEY_PREFIX: &str = "thread:";

/// The durable state of one conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadCheckpoint {
    pub thread_id: ThreadId,
    pub messages: Vec<Message>,
    /// RFC 3339, UTC, fixed microsecond precision
    pub updated_at: String,
}

#[derive(Clone)]
pub struct CheckpointStore {
    storage: Rc<dyn StoragePort>,
}

impl CheckpointStore {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    fn key(thread_id: &ThreadId) -> String {
        format!("{}{}", THREAD_KEY_PREFIX, thread_id)
    }

    pub async fn load(&self, thread_id: &ThreadId) -> Result<Option<ThreadCheckpoint>> {
        match self.storage.get(&Self::key(thread_id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Replace the stored messages of a thread and bump its timestamp.
    pub async fn save(&self, thread_id: &ThreadId, messages: Vec<Message>) -> Result<()> {
        let checkpoint = ThreadCheckpoint {
            thread_id: thread_id.clone(),
            messages,
            updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };
        let json = serde_json::to_vec(&checkpoint)?;
        self.storage.set(&Self::key(thread_id), &json).await?;
        log::debug!(
            "Checkpoint saved for {} ({} messages, {})",
            thread_id,
            checkpoint.messages.len(),
            self.storage.backend_name()
        );
        Ok(())
    }

    pub async fn messages(&self, thread_id: &ThreadId) -> Result<Vec<Message>> {
        Ok(self
            .load(thread_id)
            .await?
            .map(|c| c.messages)
            .unwrap_or_default())
    }
}

#[async_trait(?Send)]
impl ConversationStorePort for CheckpointStore {
    /// Least recently updated first; threads with no messages are skipped.
    async fn list_all_thread_ids(&self) -> Result<Vec<ThreadId>> {
        let mut checkpoints = Vec::new();
        for key in self.storage.list_keys(THREAD_KEY_PREFIX).await? {
            if let Some(bytes) = self.storage.get(&key).await? {
                let checkpoint: ThreadCheckpoint = serde_json::from_slice(&bytes)?;
                if !checkpoint.messages.is_empty() {
                    checkpoints.push(checkpoint);
                }
            }
        }
        // Fixed-width UTC timestamps sort lexicographically; ties break on id for stability
        checkpoints.sort_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| a.thread_id.cmp(&b.thread_id))
        });
        Ok(checkpoints.into_iter().map(|c| c.thread_id).collect())
    }

    async fn clear_all(&self) -> Result<()> {
        self.storage.delete_prefix(THREAD_KEY_PREFIX).await?;
        log::info!("Cleared all thread checkpoints ({})", self.storage.backend_name());
        Ok(())
    }
}
