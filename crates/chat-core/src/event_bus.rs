//! Queue of [`ChatEvent`]s from the session side to the UI.
//!
//! The coordinator pushes while an operation runs, once per streamed
//! fragment included. The app takes the whole batch at the start of each
//! frame, so events of one operation may span several frames.

use std::cell::RefCell;
use std::rc::Rc;
use chat_types::{ChatError, event::ChatEvent};

/// Shared handle; clones push into and drain from the same queue.
#[derive(Clone, Default)]
pub struct EventBus {
    queue: Rc<RefCell<Vec<ChatEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: ChatEvent) {
        self.queue.borrow_mut().push(event);
    }

    /// Report a failed operation to the UI.
    pub fn emit_error(&self, error: &ChatError) {
        self.emit(ChatEvent::Error {
            message: error.to_string(),
        });
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<ChatEvent> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }
}
