#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("authentication rejected by {provider}")]
    Unauthorized { provider: String },

    #[error("rate limited")]
    RateLimited,

    #[error("{provider} API request failed (status {status})")]
    Api { provider: String, status: u16 },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: String },

    #[error("{0}")]
    Other(String),
}
