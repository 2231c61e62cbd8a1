//! OpenAI-compatible LLM adapter.
//!
//! Works with Groq, DeepSeek, OpenAI, and any provider using the
//! OpenAI chat completions API format.
//! Uses browser `fetch()` via gloo-net for WASM compatibility; streamed
//! responses are read from the fetch body's `ReadableStream`.

use std::collections::VecDeque;
use std::pin::Pin;
use async_trait::async_trait;
use futures::stream::{self, Stream};
use gloo_net::http::Request;
use js_sys::{Reflect, Uint8Array};
use serde::Deserialize;
use serde_json::{json, Value};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

use chat_core::ports::*;
use chat_types::{
    ChatError, Result,
    config::LlmConfig,
    message::{Message, Role},
};
use super::sse::SseDecoder;

/// Provider that speaks the OpenAI chat completions protocol.
pub struct OpenAiCompatProvider {
    config: LlmConfig,
    base_url: String,
}

impl OpenAiCompatProvider {
    pub fn new(config: LlmConfig) -> Self {
        let base_url = config.base_url();
        Self { config, base_url }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/v1/models", self.base_url)
    }

    fn build_request_body(&self, req: &ChatRequest, stream: bool) -> Value {
        let messages: Vec<Value> = req.messages.iter().map(message_to_json).collect();

        let mut body = json!({
            "model": req.model,
            "messages": messages,
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        });
        if stream {
            body["stream"] = json!(true);
        }
        body
    }
}

#[async_trait(?Send)]
impl LlmPort for OpenAiCompatProvider {
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse> {
        let body = self.build_request_body(&req, false);

        let response = Request::post(&self.completions_url())
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.config.api_key))
            .json(&body)
            .map_err(|e| ChatError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ChatError::Llm(format!("HTTP {}: {}", status, text)));
        }

        let data: ApiResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Llm(e.to_string()))?;

        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Llm("No choices in response".to_string()))?;

        let message = parse_api_message(choice.message);
        let usage = data.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse { message, usage })
    }

    fn stream_chat(
        &self,
        req: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = LlmStreamEvent>>> {
        let state = SseStream {
            request: Some(PendingRequest {
                url: self.completions_url(),
                api_key: self.config.api_key.clone(),
                body: self.build_request_body(&req, true),
            }),
            reader: None,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
        };

        Box::pin(stream::unfold(state, |mut state| async move {
            let event = state.next_event().await?;
            Some((event, state))
        }))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let response = Request::get(&self.models_url())
            .header("Authorization", &format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Llm(format!("HTTP {}", response.status())));
        }

        let list: ApiModelList = response
            .json()
            .await
            .map_err(|e| ChatError::Llm(e.to_string()))?;

        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

// ─── Streaming state ─────────────────────────────────────────

struct PendingRequest {
    url: String,
    api_key: String,
    body: Value,
}

/// Drives one streamed completion: sends the request lazily on first
/// poll, then reads body chunks and decodes them until `Done` or `Error`.
struct SseStream {
    request: Option<PendingRequest>,
    reader: Option<ReadableStreamDefaultReader>,
    decoder: SseDecoder,
    pending: VecDeque<LlmStreamEvent>,
    finished: bool,
}

impl SseStream {
    async fn next_event(&mut self) -> Option<LlmStreamEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                if matches!(event, LlmStreamEvent::Done | LlmStreamEvent::Error(_)) {
                    self.finished = true;
                    self.pending.clear();
                }
                return Some(event);
            }
            if self.finished {
                return None;
            }

            if let Some(req) = self.request.take() {
                match open_stream(&req).await {
                    Ok(reader) => self.reader = Some(reader),
                    Err(e) => {
                        self.pending.push_back(LlmStreamEvent::Error(e.to_string()));
                        continue;
                    }
                }
            }

            let chunk = match self.reader.as_ref() {
                Some(reader) => read_chunk(reader).await,
                None => Ok(None),
            };
            match chunk {
                Ok(Some(bytes)) => {
                    let events = self.decoder.push(&bytes);
                    self.pending.extend(events);
                }
                Ok(None) => {
                    // Body ended; some providers close without `[DONE]`
                    self.reader = None;
                    let events = self.decoder.finish();
                    self.pending.extend(events);
                    self.pending.push_back(LlmStreamEvent::Done);
                }
                Err(e) => self.pending.push_back(LlmStreamEvent::Error(e.to_string())),
            }
        }
    }
}

async fn open_stream(req: &PendingRequest) -> Result<ReadableStreamDefaultReader> {
    let response = Request::post(&req.url)
        .header("Content-Type", "application/json")
        .header("Accept", "text/event-stream")
        .header("Authorization", &format!("Bearer {}", req.api_key))
        .json(&req.body)
        .map_err(|e| ChatError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ChatError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(ChatError::Llm(format!("HTTP {}: {}", status, text)));
    }

    let body = response
        .body()
        .ok_or_else(|| ChatError::Llm("Empty response body".to_string()))?;
    body.get_reader()
        .dyn_into::<ReadableStreamDefaultReader>()
        .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))
}

/// Read one chunk from the body; `None` once the body is exhausted.
async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Result<Option<Vec<u8>>> {
    let result = JsFuture::from(reader.read())
        .await
        .map_err(|e| ChatError::Network(format!("{:?}", e)))?;

    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }

    let value = Reflect::get(&result, &JsValue::from_str("value"))
        .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))?;
    Ok(Some(Uint8Array::new(&value).to_vec()))
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// `GET /v1/models` body; entries carry more fields than the id
#[derive(Deserialize)]
struct ApiModelList {
    #[serde(default)]
    data: Vec<ApiModel>,
}

#[derive(Deserialize)]
struct ApiModel {
    id: String,
}

// ─── Serialization helpers ───────────────────────────────────

fn message_to_json(msg: &Message) -> Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    json!({
        "role": role,
        "content": msg.content,
    })
}

fn parse_api_message(api: ApiMessage) -> Message {
    let role = match api.role.as_str() {
        "system" => Role::System,
        "user" => Role::User,
        _ => Role::Assistant,
    };
    Message {
        role,
        content: api.content.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_types::config::LlmProvider;

    fn provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::new(LlmConfig::default())
    }

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![Message::system("be brief"), Message::user("hi")],
            model: "llama-3.1-8b-instant".to_string(),
            max_tokens: 32,
            temperature: 0.3,
        }
    }

    #[test]
    fn test_completions_url_uses_provider_default() {
        assert_eq!(
            provider().completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );

        let mut config = LlmConfig::default();
        config.provider = LlmProvider::OpenAI;
        let p = OpenAiCompatProvider::new(config);
        assert_eq!(p.completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_request_body() {
        let body = provider().build_request_body(&request(), false);
        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["max_tokens"], 32);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!(body.get("stream").is_none());

        let body = provider().build_request_body(&request(), true);
        assert_eq!(body["stream"], true);
    }

    #[test]
    fn test_parse_api_message_roles() {
        let msg = parse_api_message(ApiMessage {
            role: "assistant".to_string(),
            content: Some("Trip Ideas".to_string()),
        });
        assert_eq!(msg, Message::assistant("Trip Ideas"));

        let msg = parse_api_message(ApiMessage {
            role: "tool".to_string(),
            content: None,
        });
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "");
    }

    #[test]
    fn test_api_response_deserializes() {
        let raw = r#"{
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }"#;
        let data: ApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(data.choices.len(), 1);
        assert_eq!(data.usage.unwrap().total_tokens, 4);
    }

    #[test]
    fn test_models_url_follows_override() {
        let mut config = LlmConfig::default();
        config.provider = LlmProvider::Custom;
        config.api_base = Some("http://localhost:11434".to_string());
        let p = OpenAiCompatProvider::new(config);
        assert_eq!(p.models_url(), "http://localhost:11434/v1/models");
    }

    #[test]
    fn test_model_list_deserializes() {
        let raw = r#"{
            "object": "list",
            "data": [
                {"id": "llama-3.3-70b-versatile", "object": "model", "owned_by": "Meta"},
                {"id": "whisper-large-v3", "object": "model"}
            ]
        }"#;
        let list: ApiModelList = serde_json::from_str(raw).unwrap();
        let ids: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["llama-3.3-70b-versatile", "whisper-large-v3"]);

        let empty: ApiModelList = serde_json::from_str(r#"{"object": "list"}"#).unwrap();
        assert!(empty.data.is_empty());
    }
}
