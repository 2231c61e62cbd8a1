use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title shown for a thread until its title has been generated
pub const PLACEHOLDER_TITLE: &str = "New Chat...";

/// Opaque, globally unique conversation thread identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// A fresh random identifier (UUID v4). Needs no coordination.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ThreadId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for ThreadId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// A thread as listed in the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadEntry {
    pub thread_id: ThreadId,
    pub title: String,
}

impl ThreadEntry {
    pub fn new(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            title: PLACEHOLDER_TITLE.to_string(),
        }
    }
}
