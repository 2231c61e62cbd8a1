pub mod message;
pub mod event;
pub mod thread;
pub mod config;
pub mod error;


pub use error::ChatError;
pub use thread::{ThreadEntry, ThreadId};
pub type Result<T> = std::result::Result<T, ChatError>;
