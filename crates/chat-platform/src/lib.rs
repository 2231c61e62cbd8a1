//! Browser adapters for the chat client: key/value storage backends, the
//! checkpointing response engine, and an OpenAI-compatible LLM provider.

pub mod storage;
pub mod checkpoint;
pub mod engine;
pub mod llm;

pub use checkpoint::CheckpointStore;
pub use engine::CheckpointedEngine;
