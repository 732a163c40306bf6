use std::num::NonZeroU32;
use std::str::FromStr;

use super::{Config, ProviderKind};

/// Parse `key` from the environment. Unset yields `None`; unparsable values
/// are logged and also yield `None`.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let v = std::env::var(key).ok()?;
    match v.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("ignoring invalid {key} value: {v}");
            None
        }
    }
}

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_llm();
        self.apply_env_overrides_summary();
    }

    fn apply_env_overrides_llm(&mut self) {
        if let Some(kind) = env_parse::<ProviderKind>("PRECIS_LLM_PROVIDER") {
            self.llm.provider = kind;
        }
        if let Ok(v) = std::env::var("PRECIS_LLM_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("PRECIS_LLM_MODEL") {
            self.llm.model = Some(v);
        }
        if let Some(t) = env_parse::<f32>("PRECIS_LLM_TEMPERATURE") {
            self.llm.temperature = t;
        }
        if let Some(n) = env_parse::<u32>("PRECIS_LLM_MAX_TOKENS") {
            self.llm.max_tokens = n;
        }
        if let Some(secs) = env_parse::<u64>("PRECIS_TIMEOUT_SECS") {
            self.llm.timeout_secs = secs;
        }
    }

    fn apply_env_overrides_summary(&mut self) {
        if let Some(n) = env_parse::<NonZeroU32>("PRECIS_SUMMARY_WORDS") {
            self.summary.target_words = n;
        }
        if let Some(n) = env_parse::<usize>("PRECIS_SUMMARY_MAX_INPUT_CHARS") {
            self.summary.max_input_chars = n;
        }
        if let Some(bytes) = env_parse::<u64>("PRECIS_DOCUMENT_MAX_FILE_SIZE") {
            self.document.max_file_size = bytes;
        }
    }
}
