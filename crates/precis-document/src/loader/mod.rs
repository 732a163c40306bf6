mod docx;
mod pdf;
mod text;

pub use docx::DocxLoader;
pub use pdf::PdfLoader;
pub use text::TextLoader;
