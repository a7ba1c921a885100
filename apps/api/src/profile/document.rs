//! Document-to-text seam. Turns an uploaded resume file into plain text.
//!
//! Default: `LocalDocumentExtractor` (PDF via `pdf-extract`, DOCX via `zip` +
//! `quick-xml`, plain text). `AppState` holds an `Arc<dyn DocumentExtractor>`
//! so a remote conversion service can be swapped in without touching handlers.

use std::io::{Cursor, Read};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::warn;

use crate::errors::AppError;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Detects the kind from the file extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else if lower.ends_with(".txt") {
            Some(DocumentKind::PlainText)
        } else {
            None
        }
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, filename: &str, content: Bytes) -> Result<String, AppError>;
}

pub struct LocalDocumentExtractor;

#[async_trait]
impl DocumentExtractor for LocalDocumentExtractor {
    async fn extract_text(&self, filename: &str, content: Bytes) -> Result<String, AppError> {
        let kind = DocumentKind::from_filename(filename).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!(
                "Unsupported CV file '{filename}'. Only PDF, DOCX and TXT are supported."
            ))
        })?;

        let text = match kind {
            DocumentKind::PlainText => String::from_utf8_lossy(&content).into_owned(),
            // CPU-bound; keep it off the async executor
            DocumentKind::Pdf | DocumentKind::Docx => {
                tokio::task::spawn_blocking(move || decode_binary(kind, &content))
                    .await
                    .map_err(|e| {
                        AppError::Internal(anyhow::anyhow!(
                            "spawn_blocking failed in document extraction: {e}"
                        ))
                    })?
                    .map_err(|e| {
                        warn!("{kind:?} extraction failed for {filename}: {e:#}");
                        AppError::UnprocessableEntity(
                            "Failed to parse CV. Ensure the file is valid and readable."
                                .to_string(),
                        )
                    })?
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "No readable content found in the CV after parsing.".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

fn decode_binary(kind: DocumentKind, content: &[u8]) -> anyhow::Result<String> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(content).map_err(|e| anyhow::anyhow!("{e}"))
        }
        DocumentKind::Docx => docx_text(content),
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(content).into_owned()),
    }
}

/// Paragraph text of a DOCX body, one paragraph per line.
fn docx_text(content: &[u8]) -> anyhow::Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(content)).context("DOCX is not a zip archive")?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .with_context(|| format!("DOCX has no {DOCX_BODY_PART}"))?
        .read_to_string(&mut xml)
        .context("DOCX body is not UTF-8")?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;
    loop {
        match reader.read_event().context("malformed DOCX body")? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape().context("bad entity in DOCX text")?)
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}

/// Minimal DOCX archive with one `<w:p>` per paragraph.
#[cfg(test)]
pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Write;

    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(DOCX_BODY_PART, zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
