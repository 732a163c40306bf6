use std::io::Write;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};
use precis_document::{DocumentError, DocumentKind, load_document};
use zip::write::SimpleFileOptions;

fn write_pdf(path: &Path, page_texts: &[&str]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap();
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut zip = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

#[tokio::test]
async fn plain_text_identity() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "hello world").unwrap();

    let doc = load_document(&file).await.unwrap();
    assert_eq!(doc.content, "hello world");
}

#[tokio::test]
async fn unsupported_extension_is_rejected_even_when_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("report.xyz");
    std::fs::write(&file, "content").unwrap();

    let err = load_document(&file).await.unwrap_err();
    assert!(matches!(err, DocumentError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn uppercase_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("NOTES.TXT");
    std::fs::write(&file, "content").unwrap();

    assert!(load_document(&file).await.unwrap_err().is_unsupported());
}

#[tokio::test]
async fn docx_paragraphs_joined_with_newlines() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("letter.docx");
    write_docx(&file, &["A", "B", "C"]);

    let doc = load_document(&file).await.unwrap();
    assert_eq!(doc.content, "A\nB\nC\n");
}

#[tokio::test]
async fn pdf_pages_in_document_order() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("report.pdf");
    write_pdf(&file, &["Alpha", "", "Bravo"]);

    let doc = load_document(&file).await.unwrap();
    assert_eq!(doc.metadata.extra["pages"], "3");
    assert_eq!(doc.metadata.content_type, DocumentKind::Pdf.content_type());
    let alpha = doc.content.find("Alpha").expect("first page text");
    let bravo = doc.content.find("Bravo").expect("last page text");
    assert!(alpha < bravo);

    // No separator between pages; the blank page contributes nothing.
    let page_prefix = &doc.content[..alpha];
    let gap = &doc.content[alpha + "Alpha".len()..bravo];
    assert!(page_prefix.trim().is_empty());
    assert_eq!(gap, page_prefix);
}

#[tokio::test]
async fn pdf_without_text_is_empty_or_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("scan.pdf");
    write_pdf(&file, &["", ""]);

    let doc = load_document(&file).await.unwrap();
    assert!(doc.content.trim().is_empty());
}
