use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::secret::Secret;
use crate::summarizer::{DEFAULT_MAX_INPUT_CHARS, DEFAULT_TARGET_WORDS};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

/// LLM provider backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Ollama,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => precis_llm::openai::DEFAULT_BASE_URL,
            Self::Ollama => precis_llm::ollama::DEFAULT_BASE_URL,
        }
    }

    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => precis_llm::openai::DEFAULT_MODEL,
            Self::Ollama => "llama3.2",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown provider: {s} (expected openai or ollama)"))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    /// Falls back to the provider's default endpoint when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Falls back to the provider's default model when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    #[must_use]
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

fn default_temperature() -> f32 {
    precis_llm::openai::DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    precis_llm::openai::DEFAULT_MAX_TOKENS
}

fn default_timeout_secs() -> u64 {
    precis_llm::http::DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SummaryConfig {
    #[serde(default = "default_target_words")]
    pub target_words: NonZeroU32,
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            target_words: default_target_words(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

fn default_target_words() -> NonZeroU32 {
    DEFAULT_TARGET_WORDS
}

fn default_max_input_chars() -> usize {
    DEFAULT_MAX_INPUT_CHARS
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DocumentConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_max_file_size() -> u64 {
    precis_document::DEFAULT_MAX_FILE_SIZE
}

#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub openai_api_key: Option<Secret>,
}
