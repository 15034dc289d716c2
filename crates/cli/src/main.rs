use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wavebatch_core::{
    load_config, load_config_or_default, validate_config, BatchProcessor, Config, Converter,
    FfmpegConverter, FileFailure, RunEvent, RunReport,
};

/// Buffer size for the progress event channel
const PROGRESS_BUFFER_SIZE: usize = 64;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_configuration()?;
    validate_config(&config).context("Configuration validation failed")?;

    // The root directory is the only positional argument; default to the
    // current directory like the shell-script variants.
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let converter = FfmpegConverter::new(config.converter.clone());

    // Bootstrap check: a missing or unusable transcoder aborts the whole
    // run before any files are touched.
    converter
        .validate()
        .await
        .context("Transcoder is not usable")?;

    let processor = BatchProcessor::new(config.processor.clone(), converter);

    let (tx, mut rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("{}", format_event(&event));
        }
    });

    let report = processor
        .run_with_progress(&root, tx)
        .await
        .context("Batch run failed")?;

    // The sender went down with the run; the printer drains and exits.
    let _ = printer.await;

    print!("{}", format_summary(&report));
    Ok(())
}

/// Loads configuration from `WAVEBATCH_CONFIG` if set (the file must
/// exist), otherwise from `config.toml` if present, otherwise defaults.
fn load_configuration() -> Result<Config> {
    match std::env::var("WAVEBATCH_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) => load_config_or_default(Path::new("config.toml"))
            .context("Failed to load configuration"),
    }
}

fn format_event(event: &RunEvent) -> String {
    match event {
        RunEvent::Started { candidates } => {
            format!("🔍 Found {} audio file(s)", candidates)
        }
        RunEvent::Converting { input, output } => {
            format!(
                "🔄 Converting: {}\n📝 Output name: {}",
                input.display(),
                output.display()
            )
        }
        RunEvent::Converted { input, output } => {
            format!("✅ Converted: {} → {}", input.display(), output.display())
        }
        RunEvent::Failed { input, failure } => format_failure(input, failure),
    }
}

fn format_failure(input: &Path, failure: &FileFailure) -> String {
    format!("❌ Failed: {} ({})", input.display(), failure)
}

fn format_summary(report: &RunReport) -> String {
    let mut out = format!("\n🎉 Done! Files converted: {}\n", report.converted);
    if report.failed > 0 {
        out.push_str(&format!("⚠️  Errors: {}\n", report.failed));
        if let Some(log) = &report.error_log {
            out.push_str(&format!("   Details: {}\n", log.display()));
        }
    }
    out
}
