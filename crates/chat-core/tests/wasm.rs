//! WASM-target tests for chat-core.
//!
//! Runs the registry, assembler, title and session flows under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chat_core::assembler::assemble;
use chat_core::event_bus::EventBus;
use chat_core::ports::*;
use chat_core::registry::ThreadRegistry;
use chat_core::session::SessionCoordinator;
use chat_core::title::{truncate_title, FALLBACK_TITLE};
use chat_types::config::TitleConfig;
use chat_types::event::ChatEvent;
use chat_types::message::*;
use chat_types::thread::ThreadId;
use chat_types::{ChatError, Result};

use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use async_trait::async_trait;
use futures::Stream;

// ─── Mocks ───────────────────────────────────────────────

struct MemoryBackend {
    threads: RefCell<Vec<(ThreadId, Vec<Message>)>>,
}

#[async_trait(?Send)]
impl ResponseEnginePort for MemoryBackend {
    fn stream(
        &self,
        messages: Vec<Message>,
        thread_id: &ThreadId,
    ) -> Pin<Box<dyn Stream<Item = ResponseChunk>>> {
        let mut stored = messages;
        stored.push(Message::assistant("Hello world"));
        self.threads.borrow_mut().push((thread_id.clone(), stored));
        Box::pin(futures::stream::iter(vec![
            ResponseChunk::Content("Hel".to_string()),
            ResponseChunk::Content("lo".to_string()),
            ResponseChunk::Content(" world".to_string()),
            ResponseChunk::Done,
        ]))
    }

    async fn get_state(&self, thread_id: &ThreadId) -> Result<Vec<Message>> {
        Ok(self
            .threads
            .borrow()
            .iter()
            .find(|(t, _)| t == thread_id)
            .map(|(_, m)| m.clone())
            .unwrap_or_default())
    }
}

#[async_trait(?Send)]
impl ConversationStorePort for MemoryBackend {
    async fn list_all_thread_ids(&self) -> Result<Vec<ThreadId>> {
        Ok(self.threads.borrow().iter().map(|(t, _)| t.clone()).collect())
    }

    async fn clear_all(&self) -> Result<()> {
        self.threads.borrow_mut().clear();
        Ok(())
    }
}

struct OfflineLlm;

#[async_trait(?Send)]
impl LlmPort for OfflineLlm {
    async fn chat_completion(&self, _req: ChatRequest) -> Result<ChatResponse> {
        Err(ChatError::Network("offline".to_string()))
    }

    fn stream_chat(
        &self,
        _req: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = LlmStreamEvent>>> {
        Box::pin(futures::stream::once(async { LlmStreamEvent::Done }))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

fn session(bus: &EventBus) -> (Rc<MemoryBackend>, SessionCoordinator) {
    let backend = Rc::new(MemoryBackend {
        threads: RefCell::new(Vec::new()),
    });
    let coordinator = SessionCoordinator::new(
        backend.clone(),
        backend.clone(),
        TitleConfig::default(),
        bus.clone(),
    );
    (backend, coordinator)
}

// ─── Registry / Title ────────────────────────────────────

#[wasm_bindgen_test]
fn registry_no_duplicates() {
    let mut reg = ThreadRegistry::new();
    let id = ThreadId::generate();
    reg.add(id.clone());
    reg.add(id);
    assert_eq!(reg.len(), 1);
}

#[wasm_bindgen_test]
fn title_truncation() {
    let title = truncate_title(&"z".repeat(60), 50);
    assert_eq!(title.len(), 50);
    assert!(title.ends_with("..."));
}

// ─── Assembler ───────────────────────────────────────────

#[wasm_bindgen_test]
async fn assemble_in_order() {
    let chunks = futures::stream::iter(vec![
        ResponseChunk::Content("Hel".to_string()),
        ResponseChunk::Metadata("node".to_string()),
        ResponseChunk::Content("lo".to_string()),
        ResponseChunk::Done,
    ]);
    let mut seen = Vec::new();
    let text = assemble(chunks, |f| seen.push(f.to_string())).await.unwrap();
    assert_eq!(text, "Hello");
    assert_eq!(seen, vec!["Hel", "lo"]);
}

// ─── Session ─────────────────────────────────────────────

#[wasm_bindgen_test]
async fn send_with_offline_title_llm() {
    let bus = EventBus::new();
    let (_backend, mut coordinator) = session(&bus);
    coordinator.initialize().await.unwrap();
    let active = coordinator.active_thread_id().unwrap().clone();

    coordinator.send_message("hi", &OfflineLlm).await.unwrap();

    assert_eq!(coordinator.title(&active), FALLBACK_TITLE);
    assert_eq!(
        coordinator.history(),
        &[ChatMessage::user("hi"), ChatMessage::assistant("Hello world")]
    );
}

#[wasm_bindgen_test]
async fn switch_roundtrip_and_clear() {
    let bus = EventBus::new();
    let (backend, mut coordinator) = session(&bus);
    coordinator.initialize().await.unwrap();
    let first = coordinator.active_thread_id().unwrap().clone();
    coordinator.send_message("hi", &OfflineLlm).await.unwrap();

    coordinator.new_thread().await.unwrap();
    assert!(coordinator.history().is_empty());

    coordinator.switch_thread(&first).await.unwrap();
    assert_eq!(coordinator.history().len(), 2);

    coordinator.clear_all().await.unwrap();
    assert!(coordinator.known_threads().is_empty());
    assert!(backend.list_all_thread_ids().await.unwrap().is_empty());
    assert!(bus
        .drain()
        .iter()
        .any(|e| matches!(e, ChatEvent::SessionCleared)));
}
