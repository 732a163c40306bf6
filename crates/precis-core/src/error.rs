use precis_document::DocumentError;
use precis_llm::LlmError;

/// Failure of a load-then-summarize invocation.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to extract document text: {0}")]
    Extraction(#[source] DocumentError),

    #[error("completion request failed: {0}")]
    Completion(#[from] LlmError),
}

impl From<DocumentError> for SummarizeError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::UnsupportedFormat(what) => Self::UnsupportedFormat(what),
            other => Self::Extraction(other),
        }
    }
}
