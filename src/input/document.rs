//! Uploaded CV documents

use crate::error::{Result, TailorError};
use crate::input::file_detector::{FileType, DOCX_MIME, PDF_MIME};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two document kinds a CV can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
        }
    }

    fn from_file_type(file_type: FileType, declared: &str) -> Result<Self> {
        match file_type {
            FileType::Pdf => Ok(DocumentKind::Pdf),
            FileType::Docx => Ok(DocumentKind::Docx),
            _ => Err(TailorError::UnsupportedFormat(format!(
                "'{}' is not a PDF or DOCX document",
                declared
            ))),
        }
    }

    pub fn from_mime(mime: &str) -> Result<Self> {
        Self::from_file_type(FileType::from_mime(mime), mime)
    }

    pub fn from_extension(ext: &str) -> Result<Self> {
        Self::from_file_type(FileType::from_extension(ext), ext)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "PDF"),
            DocumentKind::Docx => write!(f, "DOCX"),
        }
    }
}

/// Raw CV bytes plus the kind they were declared as. Lives only for one request.
#[derive(Clone, PartialEq)]
pub struct SourceDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, kind: DocumentKind, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind,
            bytes,
        }
    }

    pub fn from_mime(name: impl Into<String>, mime: &str, bytes: Vec<u8>) -> Result<Self> {
        Ok(Self::new(name, DocumentKind::from_mime(mime)?, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Document bodies are personal data; keep them out of debug output.
impl fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDocument")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
