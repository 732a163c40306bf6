#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(String),
}

impl DocumentError {
    /// `true` when the path was rejected by extension, before any file access.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }
}
