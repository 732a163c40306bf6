//! Summarization pipeline, configuration loading, and error taxonomy.

pub mod config;
pub mod error;
pub mod secret;
pub mod summarizer;

pub use error::SummarizeError;
pub use summarizer::{Summarizer, SummaryRequest};
