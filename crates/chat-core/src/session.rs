//! Session coordinator: the thread lifecycle state machine.
//!
//! Owns the active-thread pointer, the registry of known threads and the
//! displayed history of the active thread. Every operation runs to
//! completion before the next one starts; the UI refuses input while a
//! turn is in flight.

use std::rc::Rc;
use chat_types::{
    ChatError, Result, ThreadEntry, ThreadId,
    config::TitleConfig,
    event::ChatEvent,
    message::{ChatMessage, Message},
    thread::PLACEHOLDER_TITLE,
};
use crate::assembler::assemble;
use crate::event_bus::EventBus;
use crate::ports::{ConversationStorePort, LlmPort, ResponseEnginePort};
use crate::registry::ThreadRegistry;
use crate::store::ConversationStore;
use crate::title::TitleGenerator;

/// Transient state of one client session. Never persisted.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Always registered in `registry`
    pub active_thread_id: ThreadId,
    pub registry: ThreadRegistry,
    /// Messages of `active_thread_id` only
    pub history: Vec<ChatMessage>,
}

pub struct SessionCoordinator {
    state: Option<SessionState>,
    store: ConversationStore,
    engine: Rc<dyn ResponseEnginePort>,
    conversations: Rc<dyn ConversationStorePort>,
    titles: TitleGenerator,
    event_bus: EventBus,
}

impl SessionCoordinator {
    pub fn new(
        conversations: Rc<dyn ConversationStorePort>,
        engine: Rc<dyn ResponseEnginePort>,
        title_config: TitleConfig,
        event_bus: EventBus,
    ) -> Self {
        Self {
            state: None,
            store: ConversationStore::new(conversations.clone(), engine.clone()),
            engine,
            conversations,
            titles: TitleGenerator::new(title_config),
            event_bus,
        }
    }

    /// Swap the response engine, e.g. after the LLM settings changed.
    /// Session state is kept.
    pub fn replace_engine(&mut self, engine: Rc<dyn ResponseEnginePort>) {
        self.store = ConversationStore::new(self.conversations.clone(), engine.clone());
        self.engine = engine;
    }

    pub fn set_title_config(&mut self, config: TitleConfig) {
        self.titles = TitleGenerator::new(config);
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn active_thread_id(&self) -> Option<&ThreadId> {
        self.state.as_ref().map(|s| &s.active_thread_id)
    }

    /// Known threads in discovery/creation order; empty after a clear.
    pub fn known_threads(&self) -> &[ThreadId] {
        self.state.as_ref().map(|s| s.registry.list()).unwrap_or(&[])
    }

    pub fn history(&self) -> &[ChatMessage] {
        self.state.as_ref().map(|s| s.history.as_slice()).unwrap_or(&[])
    }

    /// Display title of any thread, falling back to the placeholder.
    pub fn title(&self, thread_id: &ThreadId) -> String {
        match &self.state {
            Some(s) => s.registry.get_title(thread_id),
            None => PLACEHOLDER_TITLE.to_string(),
        }
    }

    pub fn thread_entries(&self) -> Vec<ThreadEntry> {
        self.state
            .as_ref()
            .map(|s| s.registry.entries())
            .unwrap_or_default()
    }

    // ─── Transitions ─────────────────────────────────────────

    /// Seed a fresh session from storage: persisted threads first, then a
    /// newly generated active thread with an empty history.
    pub async fn initialize(&mut self) -> Result<()> {
        let persisted = self.store.list_persisted_threads().await?;

        let active = ThreadId::generate();
        let mut registry = ThreadRegistry::new();
        for id in persisted {
            registry.add(id);
        }
        registry.add(active.clone());

        log::info!(
            "Session initialized: {} known threads, active {}",
            registry.len(),
            active
        );

        self.state = Some(SessionState {
            active_thread_id: active,
            registry,
            history: Vec::new(),
        });
        self.publish_threads();
        self.publish_history();
        Ok(())
    }

    /// Run [`initialize`](Self::initialize) unless a session already exists.
    pub async fn ensure_initialized(&mut self) -> Result<()> {
        if self.state.is_none() {
            self.initialize().await?;
        }
        Ok(())
    }

    /// Start a new, empty thread and make it active.
    pub async fn new_thread(&mut self) -> Result<ThreadId> {
        self.ensure_initialized().await?;
        let state = self.state_mut()?;

        let id = ThreadId::generate();
        state.registry.add(id.clone());
        state.active_thread_id = id.clone();
        state.history.clear();

        log::info!("Created thread {}", id);
        self.publish_threads();
        self.publish_history();
        Ok(id)
    }

    /// Make `target` the active thread and reload its history.
    ///
    /// Switching to the thread that is already active does nothing at all,
    /// so live history is never discarded by a redundant reload.
    pub async fn switch_thread(&mut self, target: &ThreadId) -> Result<()> {
        self.ensure_initialized().await?;
        {
            let state = self.state_mut()?;
            if !state.registry.contains(target) {
                return Err(ChatError::UnknownThread(target.clone()));
            }
            if &state.active_thread_id == target {
                return Ok(());
            }
        }

        let history = self.store.load_history(target).await?;
        let state = self.state_mut()?;
        state.active_thread_id = target.clone();
        state.history = history;

        log::info!("Switched to thread {} ({} messages)", target, state.history.len());
        self.publish_threads();
        self.publish_history();
        Ok(())
    }

    /// Send a user message on the active thread and stream the reply.
    ///
    /// The first message of an untitled thread triggers title generation
    /// before anything else happens. On a mid-stream failure the user
    /// message stays in the history and no assistant message is added.
    pub async fn send_message(&mut self, content: &str, title_llm: &dyn LlmPort) -> Result<()> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.ensure_initialized().await?;

        let state = self
            .state
            .as_mut()
            .ok_or_else(|| ChatError::Other("session not initialized".to_string()))?;
        let thread_id = state.active_thread_id.clone();

        if state.history.is_empty() && !state.registry.is_titled(&thread_id) {
            let title = self.titles.generate_title(title_llm, content).await;
            state.registry.set_title(&thread_id, title.clone());
            self.event_bus.emit(ChatEvent::TitleUpdated {
                thread_id: thread_id.clone(),
                title,
            });
        }

        let user = ChatMessage::user(content);
        state.history.push(user.clone());
        self.event_bus.emit(ChatEvent::MessageAppended {
            thread_id: thread_id.clone(),
            message: user,
        });

        let context: Vec<Message> = state.history.iter().map(Message::from).collect();
        self.event_bus.emit(ChatEvent::StreamStart {
            thread_id: thread_id.clone(),
        });

        let bus = self.event_bus.clone();
        let chunks = self.engine.stream(context, &thread_id);
        let text = match assemble(chunks, |fragment| {
            bus.emit(ChatEvent::StreamDelta {
                fragment: fragment.to_string(),
            })
        })
        .await
        {
            Ok(text) => text,
            Err(e) => {
                self.event_bus.emit_error(&e);
                return Err(e);
            }
        };

        self.event_bus.emit(ChatEvent::StreamComplete { text: text.clone() });
        let reply = ChatMessage::assistant(text);
        state.history.push(reply.clone());
        self.event_bus.emit(ChatEvent::MessageAppended {
            thread_id,
            message: reply,
        });
        Ok(())
    }

    /// Purge all persisted threads and drop the session state.
    /// The next operation starts a fresh session.
    pub async fn clear_all(&mut self) -> Result<()> {
        self.store.clear_all().await?;
        self.state = None;
        log::info!("All conversations cleared");
        self.event_bus.emit(ChatEvent::SessionCleared);
        Ok(())
    }

    // ─── Helpers ─────────────────────────────────────────────

    fn state_mut(&mut self) -> Result<&mut SessionState> {
        self.state
            .as_mut()
            .ok_or_else(|| ChatError::Other("session not initialized".to_string()))
    }

    fn publish_threads(&self) {
        if let Some(active) = self.active_thread_id() {
            self.event_bus.emit(ChatEvent::ThreadListUpdated {
                active: active.clone(),
                threads: self.thread_entries(),
            });
        }
    }

    fn publish_history(&self) {
        if let Some(state) = &self.state {
            self.event_bus.emit(ChatEvent::HistoryReplaced {
                thread_id: state.active_thread_id.clone(),
                messages: state.history.clone(),
            });
        }
    }
}
