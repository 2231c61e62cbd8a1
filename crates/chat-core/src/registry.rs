//! Known threads and their display titles for the running session.

use std::collections::{HashMap, HashSet};
use chat_types::thread::{ThreadEntry, ThreadId, PLACEHOLDER_TITLE};

/// Ordered set of thread ids plus the id → title map.
///
/// Titles are not persisted, so every thread discovered in storage starts
/// with the placeholder. Pure in-memory; nothing here can fail.
#[derive(Debug, Default, Clone)]
pub struct ThreadRegistry {
    order: Vec<ThreadId>,
    titles: HashMap<ThreadId, String>,
    titled: HashSet<ThreadId>,
}

impl ThreadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `thread_id` if absent. Existing entries keep their position.
    pub fn add(&mut self, thread_id: ThreadId) {
        if self.titles.contains_key(&thread_id) {
            return;
        }
        self.titles
            .insert(thread_id.clone(), PLACEHOLDER_TITLE.to_string());
        self.order.push(thread_id);
    }

    /// Set the title of a thread, registering it first if needed.
    pub fn set_title(&mut self, thread_id: &ThreadId, title: impl Into<String>) {
        self.add(thread_id.clone());
        self.titles.insert(thread_id.clone(), title.into());
        self.titled.insert(thread_id.clone());
    }

    /// Title of a thread; the placeholder when unknown.
    pub fn get_title(&self, thread_id: &ThreadId) -> String {
        self.titles
            .get(thread_id)
            .cloned()
            .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
    }

    /// Whether a generated title has already been recorded for this thread
    pub fn is_titled(&self, thread_id: &ThreadId) -> bool {
        self.titled.contains(thread_id)
    }

    pub fn contains(&self, thread_id: &ThreadId) -> bool {
        self.titles.contains_key(thread_id)
    }

    /// Thread ids in insertion order
    pub fn list(&self) -> &[ThreadId] {
        &self.order
    }

    pub fn entries(&self) -> Vec<ThreadEntry> {
        self.order
            .iter()
            .map(|id| ThreadEntry {
                thread_id: id.clone(),
                title: self.get_title(id),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.titles.clear();
        self.titled.clear();
    }
}
