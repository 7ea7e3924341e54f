//! Input manager for loading CV documents and job descriptions from disk

use crate::error::{Result, TailorError};
use crate::input::document::{DocumentKind, SourceDocument};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use log::info;
use std::path::Path;
use tokio::fs;

/// Reads inputs for a single tailoring request. Nothing is retained between calls.
#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Loads a CV file as a [`SourceDocument`], resolving its kind from the extension.
    pub async fn load_document(&self, path: &Path) -> Result<SourceDocument> {
        self.ensure_exists(path)?;
        let extension = self.extension(path)?;
        let kind = DocumentKind::from_extension(extension).map_err(|_| {
            TailorError::UnsupportedFormat(format!(
                "CV must be a PDF or DOCX file: {}",
                path.display()
            ))
        })?;

        info!("Loading {} CV: {}", kind, path.display());
        let bytes = fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(SourceDocument::new(name, kind, bytes))
    }

    /// Reads a job description from a `.txt` or `.md` file.
    pub async fn read_job_description(&self, path: &Path) -> Result<String> {
        self.ensure_exists(path)?;
        let file_type = FileType::from_extension(self.extension(path)?);

        let bytes = fs::read(path).await?;
        match file_type {
            FileType::Text => {
                info!("Reading plain text job description: {}", path.display());
                PlainTextExtractor.extract(&bytes)
            }
            FileType::Markdown => {
                info!("Processing markdown job description: {}", path.display());
                MarkdownExtractor.extract(&bytes)
            }
            _ => Err(TailorError::UnsupportedFormat(format!(
                "Job description must be a .txt or .md file: {}",
                path.display()
            ))),
        }
    }

    fn ensure_exists(&self, path: &Path) -> Result<()> {
        if path.exists() {
            Ok(())
        } else {
            Err(TailorError::MissingInput(format!(
                "File does not exist: {}",
                path.display()
            )))
        }
    }

    fn extension<'a>(&self, path: &'a Path) -> Result<&'a str> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                TailorError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
            })
    }
}
