use serde::{Deserialize, Serialize};

/// Top-level chat client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub llm: LlmConfig,
    #[serde(default)]
    pub title: TitleConfig,
    pub storage: StorageConfig,
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            title: TitleConfig::default(),
            storage: StorageConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: String,
    pub api_base: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmConfig {
    pub fn base_url(&self) -> String {
        self.api_base
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Groq,
            model: "llama-3.3-70b-versatile".to_string(),
            api_key: String::new(),
            api_base: None,
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Settings for the one-shot title call made on a thread's first message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleConfig {
    pub model: String,
    pub max_chars: usize,
    pub max_tokens: u32,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            max_chars: 50,
            max_tokens: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    Groq,
    DeepSeek,
    OpenAI,
    Custom,
}

impl LlmProvider {
    pub fn default_base_url(&self) -> &str {
        match self {
            LlmProvider::Groq => "https://api.groq.com/openai",
            LlmProvider::DeepSeek => "https://api.deepseek.com",
            LlmProvider::OpenAI => "https://api.openai.com",
            LlmProvider::Custom => "",
        }
    }

    pub fn all() -> &'static [LlmProvider] {
        &[
            LlmProvider::Groq,
            LlmProvider::DeepSeek,
            LlmProvider::OpenAI,
            LlmProvider::Custom,
        ]
    }

    pub fn label(&self) -> &str {
        match self {
            LlmProvider::Groq => "Groq",
            LlmProvider::DeepSeek => "DeepSeek",
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    Memory,
    LocalStorage,
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, concise assistant.";
