//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! Implementations live in `chat-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use chat_types::{Result, ThreadId, message::Message};

// ─── LLM Port ────────────────────────────────────────────────

/// Streaming event from an LLM response
#[derive(Debug, Clone, PartialEq)]
pub enum LlmStreamEvent {
    /// A partial token (may be empty for role-only deltas)
    Delta(String),
    /// Stream finished
    Done,
    /// Error during streaming
    Error(String),
}

/// Request to send to an LLM
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Complete (non-streaming) response from an LLM
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub message: Message,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait(?Send)]
pub trait LlmPort {
    /// Non-streaming chat completion
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse>;

    /// Streaming chat completion as a stream of events
    fn stream_chat(
        &self,
        req: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = LlmStreamEvent>>>;

    /// List available models for this provider
    async fn list_models(&self) -> Result<Vec<String>>;
}

// ─── Response Engine Port ────────────────────────────────────

/// One unit of a streamed engine response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseChunk {
    /// Message content; empty payloads carry nothing displayable
    Content(String),
    /// Engine bookkeeping with no displayable payload
    Metadata(String),
    /// End of stream
    Done,
    /// The engine failed mid-stream
    Error(String),
}

/// The conversational engine. Owns per-thread state and writes the user
/// and assistant messages through to durable storage as it streams.
#[async_trait(?Send)]
pub trait ResponseEnginePort {
    /// Stream a reply to `messages`, the full context of `thread_id`
    fn stream(
        &self,
        messages: Vec<Message>,
        thread_id: &ThreadId,
    ) -> Pin<Box<dyn Stream<Item = ResponseChunk>>>;

    /// Persisted messages of a thread; empty when nothing is stored
    async fn get_state(&self, thread_id: &ThreadId) -> Result<Vec<Message>>;
}

// ─── Conversation Store Port ─────────────────────────────────

#[async_trait(?Send)]
pub trait ConversationStorePort {
    /// Every thread with at least one persisted message, in a stable order
    async fn list_all_thread_ids(&self) -> Result<Vec<ThreadId>>;

    /// Irreversibly delete every persisted thread
    async fn clear_all(&self) -> Result<()>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// List keys with a given prefix
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Delete every key with a given prefix
    async fn delete_prefix(&self, prefix: &str) -> Result<()> {
        for key in self.list_keys(prefix).await? {
            self.delete(&key).await?;
        }
        Ok(())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
