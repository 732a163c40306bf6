use std::future::Future;

use crate::error::LlmError;

/// A single-shot text-completion capability: prompt in, completion out.
pub trait LlmProvider: Send + Sync {
    /// Send `prompt` to the model and return the completion text.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate, rejects the
    /// request, or answers with a response that cannot be interpreted.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;

    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;
}
