//! Polyglot CLI - Command line tool for translating text.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use polyglot_core::{AppConfig, BackendKind, Language, TranslationResult, Translator};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendOption {
    Openai,
    None,
}

impl From<BackendOption> for BackendKind {
    fn from(opt: BackendOption) -> Self {
        match opt {
            BackendOption::Openai => Self::OpenAi,
            BackendOption::None => Self::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "polyglot")]
#[command(author, version, about = "Translate text with a pluggable LLM backend", long_about = None)]
struct Args {
    /// Texts to translate (reads lines from stdin when omitted)
    text: Vec<String>,

    /// Source language code (omit to let the backend detect it)
    #[arg(short = 's', long)]
    source: Option<Language>,

    /// Target language code
    #[arg(short = 't', long)]
    target: Option<Language>,

    /// Translation backend
    #[arg(long, value_enum)]
    backend: Option<BackendOption>,

    /// OpenAI API base URL
    #[arg(long, env = "POLYGLOT_API_BASE")]
    api_base: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "POLYGLOT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name for OpenAI-compatible API
    #[arg(long, env = "POLYGLOT_MODEL")]
    model: Option<String>,

    /// Custom instructions for the backend
    #[arg(long)]
    instructions: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report whether the backend is available
    #[arg(long)]
    check: bool,

    /// List supported languages
    #[arg(long)]
    list_languages: bool,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Layer CLI arguments over the loaded configuration
    fn apply(&self, config: &mut AppConfig) {
        if let Some(source) = self.source {
            config.source_lang = Some(source);
        }
        if let Some(target) = self.target {
            config.target_lang = target;
        }
        if let Some(ref instructions) = self.instructions {
            config.instructions = Some(instructions.clone());
        }

        let backend = &mut config.backend;
        if let Some(kind) = self.backend {
            backend.kind = kind.into();
        }
        if let Some(ref api_base) = self.api_base {
            backend.api_base.clone_from(api_base);
        }
        if self.api_key.is_some() {
            backend.api_key.clone_from(&self.api_key);
        }
        if let Some(ref model) = self.model {
            backend.model.clone_from(model);
        }
    }
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let stdin = std::io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn print_results(results: &[TranslationResult], json: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for result in results {
        if json {
            let line = serde_json::to_string(result).context("Failed to serialize result")?;
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{}", result.translated_text())?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if args.list_languages {
        let mut out = std::io::stdout().lock();
        for lang in Language::ALL {
            writeln!(out, "{:<6} {}", lang.code(), lang.display_name())?;
        }
        return Ok(());
    }

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let translator = Translator::new(&config);
    info!("Using {} backend", translator.capability_name());

    if args.check {
        let available = translator.is_translation_available().await;
        writeln!(
            std::io::stdout(),
            "{}: {}",
            translator.capability_name(),
            if available { "available" } else { "unavailable" }
        )?;
        if !available {
            std::process::exit(1);
        }
        return Ok(());
    }

    let texts = if args.text.is_empty() {
        read_stdin_lines()?
    } else {
        args.text.clone()
    };

    if texts.is_empty() {
        anyhow::bail!("Nothing to translate");
    }

    info!("Translating {} text(s) to {}", texts.len(), config.target_lang);

    let spinner = ProgressBar::new_spinner();
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}").unwrap());
    spinner.set_message(format!("Translating with {}", translator.capability_name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = translator
        .translate_batch(&texts, config.source_lang, config.target_lang)
        .await;
    spinner.finish_and_clear();

    let results = outcome.context("Translation failed")?;
    print_results(&results, args.json)
}
