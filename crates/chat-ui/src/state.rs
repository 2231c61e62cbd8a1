//! UI-level state that drives rendering.
//! This is a read-only projection of the session coordinator,
//! updated each frame by draining the EventBus.

use chat_types::event::ChatEvent;
use chat_types::message::{ChatMessage, ChatRole};
use chat_types::thread::{ThreadEntry, ThreadId};

/// Longest thread title shown in the sidebar before it is cut
pub const SIDEBAR_LABEL_CHARS: usize = 30;

/// State visible to UI panels
pub struct UiState {
    /// Known threads in registry order (oldest first)
    pub threads: Vec<ThreadEntry>,
    /// The thread whose history is on screen
    pub active: Option<ThreadId>,
    /// Displayed messages of the active thread
    pub messages: Vec<ChatEntry>,
    /// Streaming response text being assembled
    pub streaming_text: String,
    /// An action is in flight; new actions are refused
    pub busy: bool,
    /// Input field content
    pub input_text: String,
    /// Whether settings panel is open
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
    /// Model ids the provider reported on the last fetch
    pub models: Vec<String>,
}

/// A chat entry for display
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub kind: EntryKind,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Assistant,
    Error,
}

impl From<ChatMessage> for ChatEntry {
    fn from(msg: ChatMessage) -> Self {
        let kind = match msg.role {
            ChatRole::User => EntryKind::User,
            ChatRole::Assistant => EntryKind::Assistant,
        };
        Self {
            kind,
            content: msg.content,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            threads: Vec::new(),
            active: None,
            messages: Vec::new(),
            streaming_text: String::new(),
            busy: false,
            input_text: String::new(),
            show_settings: false,
            status_text: "Ready".to_string(),
            models: Vec::new(),
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::ThreadListUpdated { active, threads } => {
                    self.active = Some(active);
                    self.threads = threads;
                }
                ChatEvent::HistoryReplaced { thread_id, messages } => {
                    self.active = Some(thread_id);
                    self.messages = messages.into_iter().map(ChatEntry::from).collect();
                    self.streaming_text.clear();
                }
                ChatEvent::TitleUpdated { thread_id, title } => {
                    match self.threads.iter_mut().find(|t| t.thread_id == thread_id) {
                        Some(entry) => entry.title = title,
                        None => self.threads.push(ThreadEntry { thread_id, title }),
                    }
                }
                ChatEvent::MessageAppended { thread_id, message } => {
                    if self.active.as_ref() == Some(&thread_id) {
                        self.messages.push(message.into());
                    }
                }
                ChatEvent::StreamStart { .. } => {
                    self.streaming_text.clear();
                    self.status_text = "Thinking...".to_string();
                }
                ChatEvent::StreamDelta { fragment } => {
                    self.streaming_text.push_str(&fragment);
                }
                ChatEvent::StreamComplete { .. } => {
                    // The assistant message follows as MessageAppended
                    self.streaming_text.clear();
                    self.status_text = "Ready".to_string();
                }
                ChatEvent::SessionCleared => {
                    self.threads.clear();
                    self.active = None;
                    self.messages.clear();
                    self.streaming_text.clear();
                    self.status_text = "History cleared".to_string();
                }
                ChatEvent::ModelsListed { models } => {
                    self.status_text = format!("{} models available", models.len());
                    self.models = models;
                }
                ChatEvent::Error { message } => {
                    self.streaming_text.clear();
                    self.status_text = format!("Error: {}", message);
                    self.messages.push(ChatEntry {
                        kind: EntryKind::Error,
                        content: message,
                    });
                }
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Threads as the sidebar lists them: most recently added first
    pub fn threads_newest_first(&self) -> impl Iterator<Item = &ThreadEntry> {
        self.threads.iter().rev()
    }

    pub fn active_title(&self) -> Option<&str> {
        let active = self.active.as_ref()?;
        self.threads
            .iter()
            .find(|t| &t.thread_id == active)
            .map(|t| t.title.as_str())
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Sidebar label for a title, cut to [`SIDEBAR_LABEL_CHARS`] plus `"..."`
pub fn display_label(title: &str) -> String {
    if title.chars().count() > SIDEBAR_LABEL_CHARS {
        let cut: String = title.chars().take(SIDEBAR_LABEL_CHARS).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}
