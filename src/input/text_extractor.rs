//! Text extraction from CV documents and job description files

use crate::error::{Result, TailorError};
use crate::input::document::{DocumentKind, SourceDocument};
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};

/// Main part of a WordprocessingML package.
const DOCX_BODY_PART: &str = "word/document.xml";

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Extracts a CV document. Layout, tables and images are flattened or dropped.
pub fn extract(document: &SourceDocument) -> Result<String> {
    match document.kind {
        DocumentKind::Pdf => PdfExtractor.extract(&document.bytes),
        DocumentKind::Docx => DocxExtractor.extract(&document.bytes),
    }
}

/// Resolves `mime` to a document kind, then extracts.
pub fn extract_bytes(bytes: &[u8], mime: &str) -> Result<String> {
    match DocumentKind::from_mime(mime)? {
        DocumentKind::Pdf => PdfExtractor.extract(bytes),
        DocumentKind::Docx => DocxExtractor.extract(bytes),
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
            TailorError::CorruptDocument(format!("Failed to extract text from PDF: {}", e))
        })?;

        Ok(join_non_empty(pages.iter().map(String::as_str)))
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            TailorError::CorruptDocument(format!("DOCX is not a valid archive: {}", e))
        })?;

        let mut xml = String::new();
        archive
            .by_name(DOCX_BODY_PART)
            .map_err(|e| {
                TailorError::CorruptDocument(format!("DOCX has no {}: {}", DOCX_BODY_PART, e))
            })?
            .read_to_string(&mut xml)
            .map_err(|e| TailorError::CorruptDocument(format!("Failed to read DOCX body: {}", e)))?;

        let paragraphs = self.paragraphs(&xml)?;
        Ok(join_non_empty(paragraphs.iter().map(String::as_str)))
    }
}

impl DocxExtractor {
    /// Paragraph texts in document order. Paragraphs nested in text boxes are
    /// emitted before the paragraph that contains them.
    fn paragraphs(&self, xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        let mut open: Vec<String> = Vec::new();
        let mut paragraphs = Vec::new();
        let mut run_depth = 0usize;
        let mut in_text = false;

        loop {
            let event = reader.read_event().map_err(|e| {
                TailorError::CorruptDocument(format!(
                    "Malformed DOCX XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                XmlEvent::Start(e) => match e.name().as_ref() {
                    b"w:p" => open.push(String::new()),
                    b"w:r" => run_depth += 1,
                    b"w:t" => in_text = true,
                    _ => {}
                },
                // Tab stops under <w:pPr><w:tabs> share the w:tab name.
                XmlEvent::Empty(e) if run_depth > 0 => match e.name().as_ref() {
                    b"w:tab" | b"w:br" | b"w:cr" => {
                        if let Some(current) = open.last_mut() {
                            current.push(' ');
                        }
                    }
                    _ => {}
                },
                XmlEvent::Text(t) if in_text => {
                    let text = t.unescape().map_err(|e| {
                        TailorError::CorruptDocument(format!("Bad text run in DOCX: {}", e))
                    })?;
                    if let Some(current) = open.last_mut() {
                        current.push_str(&text);
                    }
                }
                XmlEvent::CData(t) if in_text => {
                    if let Some(current) = open.last_mut() {
                        current.push_str(&String::from_utf8_lossy(&t));
                    }
                }
                XmlEvent::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:r" => run_depth = run_depth.saturating_sub(1),
                    b"w:p" => {
                        if let Some(paragraph) = open.pop() {
                            paragraphs.push(paragraph);
                        }
                    }
                    _ => {}
                },
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown = String::from_utf8_lossy(bytes);
        Ok(self.flatten(&markdown))
    }
}

impl MarkdownExtractor {
    fn flatten(&self, markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) | Event::Html(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak | Event::Rule => text.push('\n'),
                Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                    text.push('\n')
                }
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Joins trimmed segments with single spaces, skipping blank ones.
fn join_non_empty<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    segments
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
