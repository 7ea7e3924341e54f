//! Output module: relevance classification, reports and formatters

pub mod classifier;
pub mod formatter;
pub mod report;

pub use classifier::{classify, GenerationResult, RELEVANCE_SENTINEL};
pub use formatter::{formatter_for, OutputFormatter};
pub use report::{ReportMetadata, TailoringReport};

use unicode_segmentation::UnicodeSegmentation;

/// Shortens `text` to at most `max_graphemes`, cutting at a word boundary when possible.
pub fn preview(text: &str, max_graphemes: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        return text.to_string();
    }

    let head = graphemes[..max_graphemes].concat();
    let cut = head.rfind(char::is_whitespace).unwrap_or(head.len());
    format!("{}...", head[..cut].trim_end())
}
