use std::fmt;
use std::path::Path;

use crate::DocumentLoader;
use crate::error::DocumentError;
use crate::loader::{DocxLoader, PdfLoader, TextLoader};

/// Extraction strategy selected from a file extension.
///
/// Matching is exact and case-sensitive: `notes.TXT` is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Text,
    Pdf,
    Docx,
}

impl DocumentKind {
    pub const ALL: [Self; 3] = [Self::Text, Self::Pdf, Self::Docx];

    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Select the strategy for `path` without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] if the path has no
    /// extension or the extension is not recognized.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let Some(ext) = path.extension() else {
            return Err(DocumentError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            )));
        };
        ext.to_str().and_then(Self::from_extension).ok_or_else(|| {
            DocumentError::UnsupportedFormat(format!(".{}", ext.to_string_lossy()))
        })
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        }
    }

    #[must_use]
    pub fn loader(self, max_file_size: u64) -> Box<dyn DocumentLoader> {
        match self {
            Self::Text => Box::new(TextLoader { max_file_size }),
            Self::Pdf => Box::new(PdfLoader { max_file_size }),
            Self::Docx => Box::new(DocxLoader { max_file_size }),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
