use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub source: String,
    pub content_type: String,
    pub extra: HashMap<String, String>,
}

/// Flat text extracted from a single file.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}
