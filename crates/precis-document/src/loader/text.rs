use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;

use crate::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentKind, DocumentLoader,
    DocumentMetadata, check_file_size,
};

pub struct TextLoader {
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for TextLoader {
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

            let content = tokio::fs::read_to_string(&path).await?;

            Ok(Document {
                content,
                metadata: DocumentMetadata {
                    source: path.display().to_string(),
                    content_type: DocumentKind::Text.content_type().to_owned(),
                    extra: HashMap::new(),
                },
            })
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }
}
