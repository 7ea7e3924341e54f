//! cv-tailor: rewrite a resume for a specific job description

use clap::Parser;
use cv_tailor::cli::{Cli, Commands, ConfigAction, TailorArgs};
use cv_tailor::config::Config;
use cv_tailor::error::{Result, TailorError};
use cv_tailor::input::manager::InputManager;
use cv_tailor::llm::{Credential, GeminiClient, Tone};
use cv_tailor::output::{formatter_for, preview};
use cv_tailor::pipeline::{TailoringInputs, TailoringPipeline};
use cv_tailor::session::{SessionContext, SpinnerReporter};
use dialoguer::{Password, Select};
use log::{debug, info};
use std::fmt::Display;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(format!("Failed to load configuration: {}", e)),
    };

    if let Err(e) = run_command(cli.command, config, cli.verbose).await {
        debug!("{:?}", e);
        fail(e);
    }
}

/// Prints to stderr regardless of the log filter, then exits.
fn fail(message: impl Display) -> ! {
    eprintln!("{}", failure_line(message));
    process::exit(1);
}

fn failure_line(message: impl Display) -> String {
    format!("❌ {}", message)
}

async fn run_command(command: Commands, config: Config, verbose: bool) -> Result<()> {
    match command {
        Commands::Tailor(args) => tailor(args, config, verbose).await,

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration\n");
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|e| TailorError::Configuration(e.to_string()))?;
                    println!("{}", rendered);
                }
                Some(ConfigAction::Path) => {
                    println!("{}", Config::config_path().display());
                }
                Some(ConfigAction::Reset) => {
                    let path = Config::config_path();
                    Config::default().save(&path)?;
                    println!("✅ Configuration reset: {}", path.display());
                }
            }
            Ok(())
        }
    }
}

async fn tailor(args: TailorArgs, mut config: Config, verbose: bool) -> Result<()> {
    if let Some(model) = args.model {
        config.model.model_id = model;
        config.validate()?;
    }
    let format = args.output.unwrap_or(config.output.format);
    let use_colors = config.output.color_output && !args.no_color;

    let tone = match args.tone {
        Some(tone) => tone,
        None if args.interactive => select_tone(config.output.default_tone)?,
        None => config.output.default_tone,
    };

    let credential = match args.api_key {
        Some(key) => Some(Credential::new(key)?),
        None if args.interactive && !args.dry_run => Some(Credential::new(prompt_api_key()?)?),
        None => None,
    };
    if credential.is_none() && !args.dry_run {
        return Err(TailorError::MissingCredential);
    }

    let manager = InputManager::new();
    let job_description = match (&args.job, args.job_text) {
        (Some(path), _) => manager.read_job_description(path).await?,
        (None, Some(text)) => text,
        (None, None) => String::new(),
    };
    let document = manager.load_document(&args.cv).await?;

    let client = GeminiClient::new(&config.model)?;
    let pipeline = TailoringPipeline::new(client, config.retry.policy());

    if args.dry_run {
        let session = SessionContext::logging();
        let request = pipeline.prepare(&session, &document, &job_description, tone)?;
        if verbose {
            println!("📄 CV preview:\n{}\n", preview(request.cv_text(), 300));
        }
        println!("{}", pipeline.render(&request));
        return Ok(());
    }

    info!("Tailoring {} for tone {}", args.cv.display(), tone);
    let session = SessionContext::new(Arc::new(SpinnerReporter::new()));
    let outcome = pipeline
        .run(
            &session,
            TailoringInputs {
                credential,
                document: Some(document),
                job_description,
                tone,
            },
        )
        .await;
    session.finish();

    let report = outcome?;
    let formatter = formatter_for(&format, use_colors);
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

fn select_tone(default: Tone) -> Result<Tone> {
    let labels: Vec<&str> = Tone::ALL.iter().map(Tone::label).collect();
    let default_index = Tone::ALL.iter().position(|t| *t == default).unwrap_or(0);

    let index = Select::new()
        .with_prompt("Select tone")
        .items(&labels)
        .default(default_index)
        .interact()?;

    Ok(Tone::ALL[index])
}

fn prompt_api_key() -> Result<String> {
    let key = Password::new()
        .with_prompt("Enter Gemini API key")
        .allow_empty_password(true)
        .interact()?;
    Ok(key)
}
