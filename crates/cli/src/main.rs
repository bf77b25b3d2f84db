mod cli;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediabatch_core::{
    load_or_create_config, validate_config, BatchOrchestrator, BatchSummary, ChannelProgressSink,
    FfmpegTranscoder, FileValidator, RequestTemplate, TargetFormat,
};

use cli::Cli;
use report::{render_summary, JsonReport};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(summary) if summary.all_succeeded() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<BatchSummary> {
    // Initialize logging; stdout is reserved for progress and results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Determine config path
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("MEDIABATCH_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let mut config = load_or_create_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    if let Some(ffmpeg) = cli.ffmpeg {
        config.transcoder.path = ffmpeg;
    }
    if let Some(max_files) = cli.max_files {
        config.app.max_files = max_files;
    }

    validate_config(&config).context("Configuration validation failed")?;

    let format = cli.format.unwrap_or_else(|| config.default_format());
    if cli.quality.is_some() && format != TargetFormat::Mp4 {
        warn!("Quality preset only applies to mp4 output, ignoring it for {}", format);
    }

    let files = FileValidator::from_config(&config.app).validate(&cli.files);
    if files.is_empty() {
        bail!("No valid input files (supported: {})", config.app.allowed_extensions.join(", "));
    }

    info!(
        files = files.len(),
        format = %format,
        transcoder = %config.transcoder.path.display(),
        "Starting batch"
    );

    let transcoder = Arc::new(FfmpegTranscoder::new(&config.transcoder.path));
    let orchestrator = Arc::new(BatchOrchestrator::new(
        transcoder,
        config.transcoder.formats.clone(),
    ));

    let requests = RequestTemplate::new(format)
        .with_quality(cli.quality)
        .with_overwrite(cli.overwrite)
        .for_paths(&files);

    let (sink, mut events) = ChannelProgressSink::new();
    let handle = orchestrator.spawn(requests, Some(Arc::new(sink)));

    // Closes when the worker drops the sink
    while let Some(event) = events.recv().await {
        if !cli.json {
            println!("[{:>5.1}%] {}", event.percent, event.message);
        }
    }

    let outcomes = handle.wait().await.context("Conversion batch failed")?;
    let summary = BatchSummary::from_outcomes(&outcomes);

    if cli.json {
        let report = JsonReport {
            summary: &summary,
            outcomes: &outcomes,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize result")?
        );
    } else {
        print!("\n{}", render_summary(&summary));
    }

    Ok(summary)
}
