//! Letitgo entry point.
//!
//! `web` serves the HTTP trigger, `index` and `properties` run one-shot
//! ingests from JSON files. Every command provisions both indices first.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use letitgo::config::init_tracing;
use letitgo::{server, Dependencies, IndexingError, Settings};
use letitgo_pipeline::source;

#[derive(Parser)]
#[command(name = "letitgo", version)]
#[command(about = "Decomposes medical records and bulk indexes them into OpenSearch", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Environment file to load before reading settings (default: .env if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Web {
        /// Temporary port number to prevent conflict
        #[arg(short, long)]
        port: Option<String>,
    },
    /// Index one origin or a JSON array of origins
    Index {
        /// Path to the origin JSON file
        file: PathBuf,
    },
    /// Index the property records of a doc
    Properties {
        /// Path to the doc JSON file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_loaded = match &cli.config {
        Some(path) => dotenv::from_path(path)
            .map_err(|e| IndexingError::config(format!("cannot load {}: {}", path.display(), e))),
        None => {
            dotenv::dotenv().ok();
            Ok(())
        }
    };

    let settings = env_loaded.and_then(|()| Settings::from_env());

    // Logging must be up before anything else is reported, including a bad config.
    let log_format = settings
        .as_ref()
        .map(|s| s.log_format)
        .unwrap_or_default();
    init_tracing(log_format);

    let result = match settings {
        Ok(settings) => run(settings, cli.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "letitgo failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(mut settings: Settings, command: Commands) -> Result<(), IndexingError> {
    if let Commands::Web { port: Some(port) } = &command {
        settings.override_port(port.clone());
    }
    settings.log_settings();

    let deps = Dependencies::new(&settings).await?;
    deps.ingestor.provision().await?;

    match command {
        Commands::Web { .. } => server::serve(&settings, deps.ingestor).await,
        Commands::Index { file } => index_origins(&deps, &file).await,
        Commands::Properties { file } => index_properties(&deps, &file).await,
    }
}

async fn index_origins(deps: &Dependencies, file: &Path) -> Result<(), IndexingError> {
    let origins = source::read_origins(file).await?;
    info!(file = %file.display(), origin_count = origins.len(), "Indexing origins");

    let mut failed = 0;
    let mut total = 0;
    for origin in &origins {
        let report = deps.ingestor.ingest_origin(origin).await?;
        info!(
            gid = ?report.gid,
            source_id = %origin.source_id,
            indexed = report.summary.succeeded,
            "Origin indexed"
        );
        failed += report.summary.failed;
        total += report.summary.total;
    }

    finish(failed, total)
}

async fn index_properties(deps: &Dependencies, file: &Path) -> Result<(), IndexingError> {
    let doc = source::read_doc(file).await?;
    info!(file = %file.display(), doc_id = doc.id, "Indexing doc records");

    let summary = deps.ingestor.ingest_doc(&doc).await?;
    finish(summary.failed, summary.total)
}

fn finish(failed: usize, total: usize) -> Result<(), IndexingError> {
    if failed > 0 {
        warn!(failed, total, "Some units were not indexed");
        return Err(IndexingError::PartialFailure { failed, total });
    }
    info!(total, "All units indexed");
    Ok(())
}
