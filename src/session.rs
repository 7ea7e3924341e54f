//! Per-request session context and status reporting

use crate::input::DocumentKind;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Caller-visible progress of a tailoring request. Attempt numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    Extracting { kind: DocumentKind },
    BuildingPrompt,
    Generating { attempt: u32, max_attempts: u32 },
    QuotaWait { attempt: u32, max_attempts: u32, wait: Duration },
    Classifying,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Extracting { kind } => write!(f, "Extracting text from {} CV...", kind),
            PipelineStatus::BuildingPrompt => write!(f, "Building tailoring prompt..."),
            PipelineStatus::Generating {
                attempt,
                max_attempts,
            } => write!(
                f,
                "Analyzing relevance and tailoring (attempt {}/{})...",
                attempt, max_attempts
            ),
            PipelineStatus::QuotaWait {
                attempt,
                max_attempts,
                wait,
            } => write!(
                f,
                "Quota limit hit on attempt {}/{}. Waiting {}s before retrying...",
                attempt,
                max_attempts,
                wait.as_secs()
            ),
            PipelineStatus::Classifying => write!(f, "Checking relevance verdict..."),
        }
    }
}

/// Receives status updates for display.
pub trait StatusReporter: Send + Sync {
    fn report(&self, status: &PipelineStatus);

    fn finish(&self) {}
}

/// Status goes to the log only.
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn report(&self, status: &PipelineStatus) {
        info!("{}", status);
    }
}

/// Terminal spinner showing the current stage.
pub struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter for SpinnerReporter {
    fn report(&self, status: &PipelineStatus) {
        self.bar.set_message(status.to_string());
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Handed to every pipeline stage so progress is reported explicitly
/// instead of through global display state.
#[derive(Clone)]
pub struct SessionContext {
    reporter: Arc<dyn StatusReporter>,
}

impl SessionContext {
    pub fn new(reporter: Arc<dyn StatusReporter>) -> Self {
        Self { reporter }
    }

    pub fn logging() -> Self {
        Self::new(Arc::new(LogReporter))
    }

    pub fn report(&self, status: PipelineStatus) {
        debug!("status: {:?}", status);
        self.reporter.report(&status);
    }

    pub fn finish(&self) {
        self.reporter.finish();
    }
}
