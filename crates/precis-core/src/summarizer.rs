use std::num::NonZeroU32;
use std::path::Path;

use precis_document::{DEFAULT_MAX_FILE_SIZE, load_document_with_limit};
use precis_llm::LlmProvider;

use crate::error::SummarizeError;

/// Characters of document text forwarded to the model by default.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 3000;

pub const DEFAULT_TARGET_WORDS: NonZeroU32 = NonZeroU32::new(150).unwrap();

/// A word-count target paired with the excerpt to summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequest<'a> {
    pub target_words: NonZeroU32,
    pub excerpt: &'a str,
}

impl<'a> SummaryRequest<'a> {
    /// Clip `text` to its first `max_input_chars` characters.
    #[must_use]
    pub fn new(text: &'a str, target_words: NonZeroU32, max_input_chars: usize) -> Self {
        Self {
            target_words,
            excerpt: truncate_chars(text, max_input_chars),
        }
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Please summarize the following text in {} words:\n\n{}",
            self.target_words, self.excerpt
        )
    }
}

/// Prefix of `text` holding at most `max_chars` characters (Unicode scalar values).
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Builds a length-bounded prompt and sends it to a single provider.
#[derive(Debug, Clone)]
pub struct Summarizer<P> {
    provider: P,
    max_input_chars: usize,
    max_file_size: u64,
}

impl<P: LlmProvider> Summarizer<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    #[must_use]
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    #[must_use]
    pub fn build_request<'a>(&self, text: &'a str, target_words: NonZeroU32) -> SummaryRequest<'a> {
        SummaryRequest::new(text, target_words, self.max_input_chars)
    }

    /// Summarize `text` in roughly `target_words` words.
    ///
    /// Only the first `max_input_chars` characters are sent. The word count is
    /// an instruction to the model and is not checked on the response.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizeError::Completion`] if the provider call fails.
    pub async fn summarize(
        &self,
        text: &str,
        target_words: NonZeroU32,
    ) -> Result<String, SummarizeError> {
        let request = self.build_request(text, target_words);
        if request.excerpt.len() < text.len() {
            tracing::debug!(
                limit = self.max_input_chars,
                dropped_bytes = text.len() - request.excerpt.len(),
                "document text truncated"
            );
        }
        let prompt = request.prompt();
        tracing::debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            prompt_chars = prompt.chars().count(),
            "sending summarization request"
        );
        self.provider
            .complete(&prompt)
            .await
            .map_err(SummarizeError::Completion)
    }

    /// Load `path` and summarize its text.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizeError::UnsupportedFormat`] or
    /// [`SummarizeError::Extraction`] if loading fails, and
    /// [`SummarizeError::Completion`] if the provider call fails.
    pub async fn summarize_file(
        &self,
        path: &Path,
        target_words: NonZeroU32,
    ) -> Result<String, SummarizeError> {
        let document = load_document_with_limit(path, self.max_file_size).await?;
        self.summarize(&document.content, target_words).await
    }
}
