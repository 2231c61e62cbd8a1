//! Response engine that streams through an LLM and checkpoints each
//! completed turn.
//!
//! The engine owns persistence of conversation content: once the LLM
//! stream finishes, the full context plus the assistant reply is saved as
//! the thread's checkpoint. A failed turn saves nothing.

use std::pin::Pin;
use std::rc::Rc;
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};

use chat_core::ports::{ChatRequest, LlmPort, LlmStreamEvent, ResponseChunk, ResponseEnginePort};
use chat_types::{Result, ThreadId, config::ChatConfig, message::Message};
use crate::checkpoint::CheckpointStore;

pub struct CheckpointedEngine {
    llm: Rc<dyn LlmPort>,
    checkpoints: CheckpointStore,
    model: String,
    max_tokens: u32,
    temperature: f32,
    system_prompt: String,
}

impl CheckpointedEngine {
    pub fn new(llm: Rc<dyn LlmPort>, checkpoints: CheckpointStore, config: &ChatConfig) -> Self {
        Self {
            llm,
            checkpoints,
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            system_prompt: config.system_prompt.clone(),
        }
    }

    fn build_request(&self, context: &[Message]) -> ChatRequest {
        // The system prompt is sent on every turn but never persisted
        let mut messages = Vec::with_capacity(context.len() + 1);
        if !self.system_prompt.trim().is_empty() {
            messages.push(Message::system(&self.system_prompt));
        }
        messages.extend_from_slice(context);
        ChatRequest {
            messages,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Progress of one streamed turn
struct Turn {
    events: Pin<Box<dyn Stream<Item = LlmStreamEvent>>>,
    checkpoints: CheckpointStore,
    thread_id: ThreadId,
    context: Vec<Message>,
    reply: String,
    phase: Phase,
}

#[derive(PartialEq)]
enum Phase {
    Start,
    Streaming,
    Finished,
}

#[async_trait(?Send)]
impl ResponseEnginePort for CheckpointedEngine {
    fn stream(
        &self,
        messages: Vec<Message>,
        thread_id: &ThreadId,
    ) -> Pin<Box<dyn Stream<Item = ResponseChunk>>> {
        let req = self.build_request(&messages);
        let turn = Turn {
            events: self.llm.stream_chat(req),
            checkpoints: self.checkpoints.clone(),
            thread_id: thread_id.clone(),
            context: messages,
            reply: String::new(),
            phase: Phase::Start,
        };
        let model = self.model.clone();

        Box::pin(stream::unfold(turn, move |mut turn| {
            let model = model.clone();
            async move {
                match turn.phase {
                    Phase::Finished => return None,
                    Phase::Start => {
                        turn.phase = Phase::Streaming;
                        return Some((ResponseChunk::Metadata(model), turn));
                    }
                    Phase::Streaming => {}
                }

                match turn.events.next().await {
                    Some(LlmStreamEvent::Delta(text)) => {
                        turn.reply.push_str(&text);
                        Some((ResponseChunk::Content(text), turn))
                    }
                    Some(LlmStreamEvent::Error(message)) => {
                        turn.phase = Phase::Finished;
                        log::error!("LLM stream failed for {}: {}", turn.thread_id, message);
                        Some((ResponseChunk::Error(message), turn))
                    }
                    Some(LlmStreamEvent::Done) | None => {
                        turn.phase = Phase::Finished;
                        let mut stored = std::mem::take(&mut turn.context);
                        stored.push(Message::assistant(std::mem::take(&mut turn.reply)));
                        let chunk = match turn.checkpoints.save(&turn.thread_id, stored).await {
                            Ok(()) => ResponseChunk::Done,
                            Err(e) => ResponseChunk::Error(format!("failed to persist turn: {}", e)),
                        };
                        Some((chunk, turn))
                    }
                }
            }
        }))
    }

    async fn get_state(&self, thread_id: &ThreadId) -> Result<Vec<Message>> {
        self.checkpoints.messages(thread_id).await
    }
}
