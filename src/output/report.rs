//! Tailoring report handed to the formatters

use crate::llm::Tone;
use crate::output::classifier::GenerationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoringReport {
    #[serde(flatten)]
    pub result: GenerationResult,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub model: String,
    pub tone: Tone,
    /// Generation calls made, including quota retries.
    pub attempts: u32,
    pub cv_characters: usize,
    pub generated_at: DateTime<Utc>,
}
