use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;
use crate::thread::{ThreadEntry, ThreadId};

/// Events emitted by the session coordinator.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    /// Known threads or the active thread changed
    ThreadListUpdated {
        active: ThreadId,
        threads: Vec<ThreadEntry>,
    },

    /// The displayed history was replaced wholesale (new, switch, init)
    HistoryReplaced {
        thread_id: ThreadId,
        messages: Vec<ChatMessage>,
    },

    /// A thread received its generated title
    TitleUpdated { thread_id: ThreadId, title: String },

    /// A message was appended to the active thread's history
    MessageAppended {
        thread_id: ThreadId,
        message: ChatMessage,
    },

    /// The response engine started streaming
    StreamStart { thread_id: ThreadId },

    /// One non-empty response fragment
    StreamDelta { fragment: String },

    /// The streamed response was assembled
    StreamComplete { text: String },

    /// All threads were purged
    SessionCleared,

    /// The provider's model list was fetched
    ModelsListed { models: Vec<String> },

    /// An operation failed
    Error { message: String },
}
