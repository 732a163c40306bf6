use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;

use crate::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentKind, DocumentLoader,
    DocumentMetadata, check_file_size,
};

pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Document, DocumentError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        Box::pin(async move {
            let path = std::fs::canonicalize(&path)?;
            check_file_size(&path, max_size).await?;

            let source = path.display().to_string();
            let pages = tokio::task::spawn_blocking(move || extract_pages(&path))
                .await
                .map_err(|e| DocumentError::Pdf(format!("PDF extraction task failed: {e}")))??;

            let mut extra = HashMap::new();
            extra.insert("pages".to_owned(), pages.len().to_string());

            Ok(Document {
                content: pages.concat(),
                metadata: DocumentMetadata {
                    source,
                    content_type: DocumentKind::Pdf.content_type().to_owned(),
                    extra,
                },
            })
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

/// Text of each page in document order. Pages without a text layer yield `""`.
fn extract_pages(path: &Path) -> Result<Vec<String>, DocumentError> {
    let bytes = std::fs::read(path)?;
    pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| DocumentError::Pdf(e.to_string()))
}
