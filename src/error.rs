//! Error handling for the CV tailoring pipeline

use crate::llm::GenerationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TailorError {
    #[error("No API key provided. Pass --api-key, set GEMINI_API_KEY, or use --interactive")]
    MissingCredential,

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Could not read document: {0}")]
    CorruptDocument(String),

    #[error("API quota exhausted after {attempts} attempts. Please wait a few minutes and try again later")]
    QuotaExhausted { attempts: u32 },

    #[error("Generation failed: {0}")]
    Upstream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, TailorError>;

/// Non-quota generation failures surface with the provider's message.
impl From<GenerationError> for TailorError {
    fn from(err: GenerationError) -> Self {
        TailorError::Upstream(err.to_string())
    }
}

impl From<dialoguer::Error> for TailorError {
    fn from(err: dialoguer::Error) -> Self {
        TailorError::Prompt(err.to_string())
    }
}
