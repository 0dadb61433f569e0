// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! chatscribe - turns chat exports into self-contained HTML transcripts.
//!
//! This is the binary entry point.

mod batch;
mod pipeline;
mod stats;

use std::path::PathBuf;

use chatscribe_cache::TranscriptionCache;
use chatscribe_config::locale::load_locale_code;
use chatscribe_config::ScribeConfig;
use chatscribe_core::ScribeError;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::pipeline::{load_template, RenderJob, Renderer};

/// chatscribe - turns chat exports into self-contained HTML transcripts.
#[derive(Parser, Debug)]
#[command(name = "chatscribe", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard lookup.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one extracted export directory.
    Render {
        export_dir: PathBuf,
        /// Output file (default: `<export_dir>_transcript.html` next to the export).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Transcription language (default: auto-detect).
        #[arg(short, long)]
        language: Option<String>,
        /// Template file (default: the bundled template).
        #[arg(short, long)]
        template: Option<PathBuf>,
        /// Locale of the export text (default: `locale.code`).
        #[arg(long)]
        locale: Option<String>,
        /// Leave audio attachments untranscribed.
        #[arg(long)]
        no_transcribe: bool,
    },
    /// Render several export directories in order.
    Batch {
        #[arg(required = true)]
        export_dirs: Vec<PathBuf>,
        /// Transcription language (default: auto-detect).
        #[arg(short, long)]
        language: Option<String>,
        /// Locale of the export text (default: `locale.code`).
        #[arg(long)]
        locale: Option<String>,
        /// Skip exports whose output file already exists.
        #[arg(long)]
        skip_existing: bool,
    },
    /// Inspect the transcription cache.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
    /// Manage chatscribe configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommands {
    /// Show entry count and size of the cache directory.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate the configuration, reporting every problem.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => chatscribe_config::load_and_validate_path(path),
        None => chatscribe_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            chatscribe_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.general.log_level);
    chatscribe_cache::recording::register_metrics();

    let result = match cli.command {
        Commands::Render {
            export_dir,
            output,
            language,
            template,
            locale,
            no_transcribe,
        } => {
            let job = RenderJob {
                output,
                language,
                transcribe: !no_transcribe,
                ..RenderJob::new(export_dir)
            };
            run_render(&config, job, template, locale.as_deref()).await
        }
        Commands::Batch {
            export_dirs,
            language,
            locale,
            skip_existing,
        } => run_batch(&config, &export_dirs, language.as_deref(), locale.as_deref(), skip_existing).await,
        Commands::Cache {
            action: CacheCommands::Stats { json },
        } => stats::run_stats(&config.cache.resolved_dir(), json).await,
        Commands::Config {
            action: ConfigCommands::Check,
        } => {
            print_config_summary(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("chatscribe: {e}");
        std::process::exit(1);
    }
}

async fn run_render(
    config: &ScribeConfig,
    job: RenderJob,
    template: Option<PathBuf>,
    locale: Option<&str>,
) -> Result<(), ScribeError> {
    let template_path = template.or_else(|| config.render.template.clone());
    let renderer = build_renderer(config, template_path, locale, job.transcribe)?;
    let output = renderer.render(&job).await?;
    println!("{}", output.display());
    Ok(())
}

async fn run_batch(
    config: &ScribeConfig,
    export_dirs: &[PathBuf],
    language: Option<&str>,
    locale: Option<&str>,
    skip_existing: bool,
) -> Result<(), ScribeError> {
    let renderer = build_renderer(config, config.render.template.clone(), locale, true)?;
    let summary = batch::run_batch(&renderer, export_dirs, language, skip_existing).await;
    println!(
        "rendered {}, skipped {}, failed {}",
        summary.rendered, summary.skipped, summary.failed
    );
    if summary.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}

fn build_renderer<'c>(
    config: &'c ScribeConfig,
    template: Option<PathBuf>,
    locale: Option<&str>,
    transcribe: bool,
) -> Result<Renderer<'c>, ScribeError> {
    let code = locale.unwrap_or(&config.locale.code);
    let locale = load_locale_code(code, config.locale.dir.as_deref())?;
    let template = load_template(template.as_deref())?;

    let cache = if transcribe && config.transcription.enabled {
        let transcriber = chatscribe_whisper::from_config(&config.transcription)?;
        let dir = config.cache.resolved_dir();
        info!(dir = %dir.display(), "transcription cache");
        Some(TranscriptionCache::new(dir, transcriber))
    } else {
        None
    };

    Renderer::new(config, locale, template, cache)
}

fn print_config_summary(config: &ScribeConfig) {
    println!("configuration OK");
    println!(
        "  transcription: {} ({:?}, model {})",
        if config.transcription.enabled { "enabled" } else { "disabled" },
        config.transcription.backend,
        config.transcription.model
    );
    println!("  cache:         {}", config.cache.resolved_dir().display());
    println!("  locale:        {}", config.locale.code);
    match &config.render.template {
        Some(path) => println!("  template:      {}", path.display()),
        None => println!("  template:      bundled"),
    }
}

/// Initialize the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatscribe={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
