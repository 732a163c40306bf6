use ollama_rs::Ollama;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::models::ModelOptions;

use crate::error::LlmError;
use crate::provider::LlmProvider;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Local model backend using Ollama's `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Ollama,
    model: String,
    temperature: f32,
}

impl OllamaProvider {
    #[must_use]
    pub fn new(base_url: &str, model: String, temperature: f32) -> Self {
        let (host, port) = parse_host_port(base_url);
        Self {
            client: Ollama::new(host, port),
            model,
            temperature,
        }
    }

    /// Check if Ollama is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection to Ollama fails.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        self.client.list_local_models().await.map_err(|e| {
            LlmError::Other(format!("failed to connect to Ollama, is it running? {e}"))
        })?;
        Ok(())
    }
}

impl LlmProvider for OllamaProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerationRequest::new(self.model.clone(), prompt.to_owned())
            .options(ModelOptions::default().temperature(self.temperature));

        let response = self
            .client
            .generate(request)
            .await
            .map_err(|e| LlmError::Other(format!("Ollama generate request failed: {e}")))?;

        Ok(response.response)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn parse_host_port(url: &str) -> (String, u16) {
    let url = url.trim_end_matches('/');
    if let Some(colon_pos) = url.rfind(':') {
        let port_str = &url[colon_pos + 1..];
        if let Ok(port) = port_str.parse::<u16>() {
            let host = url[..colon_pos].to_string();
            return (host, port);
        }
    }
    (url.to_string(), 11434)
}
