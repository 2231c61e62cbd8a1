//! Conversation store adapter.
//!
//! Combines the two persistence-facing collaborators: the conversation
//! store (thread listing, purge) and the response engine's per-thread
//! state (history reload). Storage errors propagate unchanged.

use std::rc::Rc;
use chat_types::{Result, ThreadId, message::ChatMessage};
use crate::ports::{ConversationStorePort, ResponseEnginePort};

#[derive(Clone)]
pub struct ConversationStore {
    store: Rc<dyn ConversationStorePort>,
    engine: Rc<dyn ResponseEnginePort>,
}

impl ConversationStore {
    pub fn new(store: Rc<dyn ConversationStorePort>, engine: Rc<dyn ResponseEnginePort>) -> Self {
        Self { store, engine }
    }

    /// Every thread with at least one stored message, in the store's order.
    pub async fn list_persisted_threads(&self) -> Result<Vec<ThreadId>> {
        self.store.list_all_thread_ids().await
    }

    /// Full persisted history of a thread, mapped to display roles.
    pub async fn load_history(&self, thread_id: &ThreadId) -> Result<Vec<ChatMessage>> {
        let persisted = self.engine.get_state(thread_id).await?;
        Ok(persisted.iter().map(ChatMessage::from_persisted).collect())
    }

    /// Destructive and unconditional; confirmation is the caller's concern.
    pub async fn clear_all(&self) -> Result<()> {
        self.store.clear_all().await
    }
}
