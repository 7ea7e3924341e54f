//! Output formatters for the two presentation states

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::classifier::GenerationResult;
use crate::output::report::TailoringReport;
use colored::{Color, Colorize};

pub const SUCCESS_NOTICE: &str = "CV Successfully Tailored!";
pub const COPY_HINT: &str = "Copy your new CV content:";

pub trait OutputFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub fn formatter_for(format: &OutputFormat, use_colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(use_colors)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color, bold: bool) -> String {
        match (self.use_colors, bold) {
            (false, _) => text.to_string(),
            (true, false) => text.color(color).to_string(),
            (true, true) => text.color(color).bold().to_string(),
        }
    }

    fn rule(&self) -> String {
        self.colorize(&"─".repeat(60), Color::BrightBlack, false)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String> {
        let mut out = String::new();

        match &report.result {
            GenerationResult::Mismatch(text) => {
                out.push_str(&self.colorize(text, Color::Yellow, true));
                out.push('\n');
            }
            GenerationResult::Tailored(text) => {
                out.push_str(&self.colorize(&format!("✅ {}", SUCCESS_NOTICE), Color::Green, true));
                out.push_str("\n\n");
                out.push_str(COPY_HINT);
                out.push('\n');
                out.push_str(&self.rule());
                out.push('\n');
                out.push_str(text.trim_end());
                out.push('\n');
                out.push_str(&self.rule());
                out.push('\n');
            }
        }

        let meta = &report.metadata;
        out.push('\n');
        out.push_str(&self.colorize(
            &format!(
                "Model: {} | Tone: {} | Attempts: {}",
                meta.model, meta.tone, meta.attempts
            ),
            Color::BrightBlack,
            false,
        ));
        out.push('\n');

        Ok(out)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}
