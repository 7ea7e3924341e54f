//! LLM integration module

pub mod gemini;
pub mod prompts;
pub mod retry;

use crate::error::{Result, TailorError};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use prompts::{build_prompt, TailoringRequest, Tone};
pub use retry::{Backoff, RetryPolicy, RetryState};

/// Caller-supplied API key. Held in memory for one request; never logged or serialized.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(TailorError::MissingCredential);
        }
        Ok(Self(secret.trim().to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Failures from a single generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Upstream rate or usage limit. The only retryable kind.
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, GenerationError::QuotaExhausted(_))
    }
}

/// A remote text-generation endpoint.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        credential: &Credential,
    ) -> std::result::Result<String, GenerationError>;

    fn model(&self) -> &str;
}
