use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::pin::Pin;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentKind, DocumentLoader,
    DocumentMetadata, check_file_size,
};

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxLoader {
    pub max_file_size: u64,
}

impl Default for DocxLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for DocxLoader {
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
            let paragraphs = tokio::task::spawn_blocking(move || read_paragraphs(&path))
                .await
                .map_err(|e| DocumentError::Docx(format!("DOCX extraction task failed: {e}")))??;

            let mut content = String::new();
            for paragraph in &paragraphs {
                content.push_str(paragraph);
                content.push('\n');
            }

            let mut extra = HashMap::new();
            extra.insert("paragraphs".to_owned(), paragraphs.len().to_string());

            Ok(Document {
                content,
                metadata: DocumentMetadata {
                    source,
                    content_type: DocumentKind::Docx.content_type().to_owned(),
                    extra,
                },
            })
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }
}

fn read_paragraphs(path: &Path) -> Result<Vec<String>, DocumentError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| DocumentError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DocumentError::Docx(format!("{DOCUMENT_PART}: {e}")))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| DocumentError::Docx(format!("{DOCUMENT_PART}: {e}")))?;
    parse_paragraphs(&xml)
}

/// Text of each top-level body paragraph (`w:body/w:p`) in document order.
///
/// Run text (`w:t`) is concatenated; `w:tab` inside a run becomes `\t`,
/// `w:cr` and text-wrapping `w:br` become `\n`. Paragraphs inside tables or
/// text boxes are skipped.
fn parse_paragraphs(xml: &str) -> Result<Vec<String>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Docx(format!("malformed {DOCUMENT_PART}: {e}")))?;
        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if name == b"w:p" && parent_is(&stack, b"w:body") {
                    current = Some(String::new());
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = e.name();
                let name = name.as_ref();
                if name == b"w:p" && parent_is(&stack, b"w:body") {
                    paragraphs.push(String::new());
                } else if in_top_level_run(&stack)
                    && let Some(text) = current.as_mut()
                {
                    match name {
                        b"w:tab" => text.push('\t'),
                        b"w:cr" => text.push('\n'),
                        b"w:br" if is_line_break(&e)? => text.push('\n'),
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                if parent_is(&stack, b"w:t")
                    && paragraph_depth(&stack) == 1
                    && let Some(text) = current.as_mut()
                {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| DocumentError::Docx(format!("bad text in paragraph: {e}")))?;
                    text.push_str(&unescaped);
                }
            }
            Event::End(_) => {
                let closed = stack.pop();
                if closed.as_deref() == Some(b"w:p".as_slice())
                    && parent_is(&stack, b"w:body")
                    && let Some(text) = current.take()
                {
                    paragraphs.push(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Page and column breaks carry no text; only `w:br` without a type or with
/// `w:type="textWrapping"` becomes a newline.
fn is_line_break(e: &BytesStart<'_>) -> Result<bool, DocumentError> {
    let kind = e
        .try_get_attribute("w:type")
        .map_err(|err| DocumentError::Docx(format!("bad w:br attribute: {err}")))?;
    Ok(kind.is_none_or(|attr| attr.value.as_ref() == b"textWrapping"))
}

fn parent_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().is_some_and(|n| n.as_slice() == name)
}

fn paragraph_depth(stack: &[Vec<u8>]) -> usize {
    stack.iter().filter(|n| n.as_slice() == b"w:p").count()
}

fn in_top_level_run(stack: &[Vec<u8>]) -> bool {
    parent_is(stack, b"w:r") && paragraph_depth(stack) == 1
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
        )
    }

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    fn write_docx(path: &Path, xml: &str) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn paragraphs_in_order() {
        let xml = document_xml(&[para("A"), para("B"), para("C")].concat());
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn runs_are_concatenated() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:jc w:val="left"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["Hello world"]);
    }

    #[test]
    fn tabs_and_breaks_inside_runs() {
        let xml = document_xml(
            "<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>",
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["a\tb\nc"]);
    }

    #[test]
    fn page_and_column_breaks_are_not_text() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>A</w:t><w:br w:type="page"/><w:t>B</w:t><w:br w:type="column"/><w:t>C</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["ABC"]);
    }

    #[test]
    fn text_wrapping_break_is_newline() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>A</w:t><w:br w:type="textWrapping" w:clear="all"/><w:t>B</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["A\nB"]);
    }

    #[test]
    fn tab_stop_definitions_are_not_text() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["x"]);
    }

    #[test]
    fn empty_paragraphs_are_kept() {
        let xml = document_xml(&format!("{}<w:p/><w:p></w:p>{}", para("A"), para("B")));
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["A", "", "", "B"]);
    }

    #[test]
    fn hyperlink_runs_are_included() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>see </w:t></w:r><w:hyperlink r:id="rId4"><w:r><w:t>docs</w:t></w:r></w:hyperlink></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["see docs"]);
    }

    #[test]
    fn table_paragraphs_are_skipped() {
        let xml = document_xml(&format!(
            "{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            para("before"),
            para("cell"),
            para("after")
        ));
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = document_xml(&para("Fish &amp; chips &lt;3"));
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["Fish & chips <3"]);
    }

    #[test]
    fn deleted_text_is_ignored() {
        let xml = document_xml(
            "<w:p><w:r><w:t>kept</w:t></w:r><w:del><w:r><w:delText>gone</w:delText></w:r></w:del></w:p>",
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["kept"]);
    }

    #[test]
    fn no_paragraphs() {
        assert!(parse_paragraphs(&document_xml("")).unwrap().is_empty());
    }

    #[test]
    fn mismatched_tags_are_docx_error() {
        let err = parse_paragraphs("<w:document><w:body><w:p></w:body></w:document>")
            .unwrap_err();
        assert!(matches!(err, DocumentError::Docx(_)));
    }

    #[tokio::test]
    async fn load_three_paragraph_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("abc.docx");
        write_docx(&file, &document_xml(&[para("A"), para("B"), para("C")].concat()));

        let doc = DocxLoader::default().load(&file).await.unwrap();
        assert_eq!(doc.content, "A\nB\nC\n");
        assert_eq!(doc.metadata.extra["paragraphs"], "3");
        assert_eq!(
            doc.metadata.content_type,
            DocumentKind::Docx.content_type()
        );
    }

    #[tokio::test]
    async fn load_document_without_paragraphs_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.docx");
        write_docx(&file, &document_xml(""));

        let doc = DocxLoader::default().load(&file).await.unwrap();
        assert_eq!(doc.content, "");
    }

    #[tokio::test]
    async fn not_a_zip_is_docx_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.docx");
        std::fs::write(&file, "plain text pretending to be docx").unwrap();

        let err = DocxLoader::default().load(&file).await.unwrap_err();
        assert!(matches!(err, DocumentError::Docx(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_document_part_is_docx_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hollow.docx");
        let mut zip = zip::ZipWriter::new(File::create(&file).unwrap());
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.finish().unwrap();

        let err = DocxLoader::default().load(&file).await.unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }

    #[tokio::test]
    async fn load_nonexistent_file() {
        let result = DocxLoader::default()
            .load(Path::new("/nonexistent/file.docx"))
            .await;
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
