mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

use crate::secret::Secret;

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error describing the first out-of-range setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            bail!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            );
        }
        if self.llm.max_tokens == 0 {
            bail!("llm.max_tokens must be greater than 0");
        }
        if self.llm.timeout_secs == 0 {
            bail!("llm.timeout_secs must be greater than 0");
        }
        if self.summary.max_input_chars == 0 {
            bail!("summary.max_input_chars must be greater than 0");
        }
        if self.document.max_file_size == 0 {
            bail!("document.max_file_size must be greater than 0");
        }
        Ok(())
    }

    /// Read API keys from the environment. `PRECIS_OPENAI_API_KEY` wins over
    /// `OPENAI_API_KEY`.
    pub fn resolve_secrets(&mut self) {
        let key = std::env::var("PRECIS_OPENAI_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());
        if let Some(key) = key {
            self.secrets.openai_api_key = Some(Secret::from(key));
        }
    }
}
