//! Relevance verdict detection

use serde::{Deserialize, Serialize};

/// Substring the model emits when it judges the JD a mismatch.
pub const RELEVANCE_SENTINEL: &str = "RELEVANCE ALERT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "text", rename_all = "snake_case")]
pub enum GenerationResult {
    Mismatch(String),
    Tailored(String),
}

impl GenerationResult {
    pub fn text(&self) -> &str {
        match self {
            GenerationResult::Mismatch(text) | GenerationResult::Tailored(text) => text,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, GenerationResult::Mismatch(_))
    }
}

/// Pure containment check; the text is carried through unchanged.
pub fn classify(text: impl Into<String>) -> GenerationResult {
    let text = text.into();
    if text.contains(RELEVANCE_SENTINEL) {
        GenerationResult::Mismatch(text)
    } else {
        GenerationResult::Tailored(text)
    }
}
