//! CLI entry point for the conveyor incident dashboard.
//!
//! Provides subcommands for serving the dashboard API with a periodic
//! export fetch, and for one-shot classification of a single export.

use anyhow::Result;
use clap::{Parser, Subcommand};
use conveyor_watch::{
    aggregate::process_batch,
    fetch::{BasicClient, HttpClient, auth::ApiKey, fetch_bytes},
    ingest,
    output::{append_record, print_json},
    parser::parse_rows,
    server::{self, AppState},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "conveyor_watch")]
#[command(about = "Classifies conveyor-line incident exports and serves a dashboard API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch incident exports periodically and serve the dashboard API
    Serve {
        /// URL of the incident export (falls back to the EXPORT_URL env var)
        #[arg(long)]
        source_url: Option<String>,

        /// Directory where fetched exports are stored
        #[arg(short, long, default_value = "data")]
        data_dir: String,

        /// Seconds between fetches
        #[arg(short = 'r', long, default_value_t = 86400)]
        fetch_interval: u64,

        /// Address to bind the HTTP server on
        #[arg(short, long, default_value = "127.0.0.1:8350")]
        bind: String,
    },
    /// Classify a single export from a file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to append classified records to
        #[arg(short, long, default_value = "classified.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/conveyor_watch.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("conveyor_watch.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            source_url,
            data_dir,
            fetch_interval,
            bind,
        } => {
            serve(source_url, data_dir.into(), fetch_interval, bind).await?;
        }
        Commands::Analyze { source, output } => {
            let bytes = fetcher(&source).await?;
            let rows = parse_rows(&bytes)?;
            let snapshot = process_batch(&rows);

            for record in &snapshot.records {
                append_record(&output, record)?;
            }
            print_json(&snapshot)?;

            info!(
                rows = snapshot.records.len(),
                output, "Classified records appended"
            );
        }
    }

    Ok(())
}

/// Runs the dashboard server with a periodic export fetch.
async fn serve(
    source_url: Option<String>,
    data_dir: PathBuf,
    fetch_interval: u64,
    bind: String,
) -> Result<()> {
    let source_url = source_url.or_else(|| std::env::var("EXPORT_URL").ok());
    let state = Arc::new(AppState::new());

    // Initial load: fetch fresh data if a URL is configured, falling back to
    // the most recent stored export on failure.
    match &source_url {
        Some(url) => {
            let client = build_client();
            if let Err(e) = ingest::run_cycle(&client, url, &data_dir, &state).await {
                error!(error = %e, "Initial fetch failed, trying stored exports");
                ingest::publish_latest(&data_dir, &state).await?;
            }
        }
        None => {
            info!("No export URL configured, serving stored exports only");
            ingest::publish_latest(&data_dir, &state).await?;
        }
    }

    if let Some(url) = source_url {
        let client = build_client();
        tokio::spawn(ingest::run_ingest_loop(
            client,
            url,
            data_dir,
            state.clone(),
            fetch_interval,
        ));
    }

    server::run(state, &bind).await
}

/// Builds the fetch client, wrapping it with bearer auth when
/// EXPORT_API_KEY is set.
fn build_client() -> Box<dyn HttpClient> {
    match std::env::var("EXPORT_API_KEY") {
        Ok(key) if !key.is_empty() => Box::new(ApiKey::bearer(BasicClient::new(), key)),
        _ => Box::new(BasicClient::new()),
    }
}

/// Loads export data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &String) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}
