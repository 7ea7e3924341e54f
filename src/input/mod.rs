//! Input processing module
//! Handles file detection, CV text extraction, and input loading

pub mod document;
pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use document::{DocumentKind, SourceDocument};
pub use text_extractor::{extract, extract_bytes};
