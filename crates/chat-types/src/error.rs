use thiserror::Error;

use crate::thread::ThreadId;

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Response stream failed: {0}")]
    Stream(String),

    #[error("Unknown thread: {0}")]
    UnknownThread(ThreadId),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
