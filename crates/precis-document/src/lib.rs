//! Document loading: maps a file path to a single flat text representation.

pub mod error;
pub mod kind;
pub mod loader;
pub mod types;

use std::path::Path;
use std::pin::Pin;

pub use error::DocumentError;
pub use kind::DocumentKind;
pub use loader::{DocxLoader, PdfLoader, TextLoader};
pub use types::{Document, DocumentMetadata};

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Document, DocumentError>> + Send + '_>>;

    fn supported_extensions(&self) -> &[&str];
}

/// Load `path` with the strategy chosen by its extension.
///
/// # Errors
///
/// Returns [`DocumentError::UnsupportedFormat`] for unrecognized extensions,
/// otherwise any IO, size or parse error from the selected loader.
pub async fn load_document(path: &Path) -> Result<Document, DocumentError> {
    load_document_with_limit(path, DEFAULT_MAX_FILE_SIZE).await
}

/// Like [`load_document`] with an explicit size limit in bytes.
///
/// # Errors
///
/// See [`load_document`].
pub async fn load_document_with_limit(
    path: &Path,
    max_file_size: u64,
) -> Result<Document, DocumentError> {
    let kind = DocumentKind::from_path(path)?;
    tracing::debug!(path = %path.display(), %kind, "loading document");
    let document = kind.loader(max_file_size).load(path).await?;
    tracing::debug!(chars = document.content.chars().count(), "document loaded");
    Ok(document)
}

/// Fail with [`DocumentError::FileTooLarge`] if the file exceeds `max_size`.
pub(crate) async fn check_file_size(path: &Path, max_size: u64) -> Result<(), DocumentError> {
    let meta = tokio::fs::metadata(path).await?;
    if meta.len() > max_size {
        return Err(DocumentError::FileTooLarge(meta.len()));
    }
    Ok(())
}
