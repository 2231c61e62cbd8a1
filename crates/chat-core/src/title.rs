//! Short display titles for new threads.

use chat_types::{Result, config::TitleConfig, message::Message};
use crate::ports::{ChatRequest, LlmPort};

pub const TITLE_INSTRUCTION: &str = "Generate a very short title (max 4 words) for this chat based on the user's overall message. Do not use quotes.";

/// Used whenever the title LLM call fails
pub const FALLBACK_TITLE: &str = "New Conversation";

const ELLIPSIS: &str = "...";

pub struct TitleGenerator {
    config: TitleConfig,
}

impl TitleGenerator {
    pub fn new(config: TitleConfig) -> Self {
        Self { config }
    }

    /// Ask the LLM for a title. Errors come back untouched.
    pub async fn try_generate_title(&self, llm: &dyn LlmPort, first_message: &str) -> Result<String> {
        let req = ChatRequest {
            messages: vec![
                Message::system(TITLE_INSTRUCTION),
                Message::user(first_message),
            ],
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: 0.3,
        };
        let response = llm.chat_completion(req).await?;
        if let Some(usage) = &response.usage {
            log::debug!(
                "Title call used {} tokens ({} prompt, {} completion)",
                usage.total_tokens,
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }
        Ok(truncate_title(response.message.content.trim(), self.config.max_chars))
    }

    /// Best-effort title: any collaborator failure yields [`FALLBACK_TITLE`].
    pub async fn generate_title(&self, llm: &dyn LlmPort, first_message: &str) -> String {
        match self.try_generate_title(llm, first_message).await {
            Ok(title) => title,
            Err(e) => {
                log::warn!("Title generation failed ({}), using fallback", e);
                FALLBACK_TITLE.to_string()
            }
        }
    }
}

/// Cap `title` at `max_chars` characters, replacing the tail with "..."
/// when it is longer. Caps too small for the ellipsis cut without one.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return title.chars().take(max_chars).collect();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = title.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
