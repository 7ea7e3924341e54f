//! CLI interface for cv-tailor

use crate::config::OutputFormat;
use crate::llm::Tone;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cv-tailor")]
#[command(about = "Tailor a resume to a job description with a hosted LLM")]
#[command(
    long_about = "Extracts your CV, checks its relevance against a job description, and rewrites it for ATS screening using the Gemini API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tailor a CV to a job description
    Tailor(TailorArgs),

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
pub struct TailorArgs {
    /// Path to the CV (PDF or DOCX)
    #[arg(long)]
    pub cv: PathBuf,

    /// Path to the job description (TXT or MD)
    #[arg(short, long, conflicts_with = "job_text")]
    pub job: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    pub job_text: Option<String>,

    /// Tone: professional, modern, technical
    #[arg(short, long, value_parser = parse_tone)]
    pub tone: Option<Tone>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier (overrides configuration)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output format: console, json
    #[arg(short, long, value_parser = parse_output_format)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Prompt for a missing API key and tone
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the prompt without calling the model
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

pub fn parse_tone(tone: &str) -> Result<Tone, String> {
    tone.parse()
}
