use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use medlookup_core::Dataset;
use medlookup_server::{build_service, http, Config, Overrides};
use tracing_subscriber::EnvFilter;

/// Medicine lookup assistant: JSON API for drug summaries and prescription OCR.
#[derive(Debug, Parser)]
#[command(name = "medlookup", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Medicine dataset (JSON array of records)
    #[arg(short, long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let overrides = Overrides {
        host: args.host,
        port: args.port,
        dataset: args.dataset,
    };
    let config = Config::resolve(args.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!("Medlookup starting v{}", env!("CARGO_PKG_VERSION"));

    let dataset = Dataset::load(&config.dataset.path).with_context(|| {
        format!("Failed to load dataset {}", config.dataset.path.display())
    })?;

    let service = build_service(&config, dataset).context("Failed to set up summary generator")?;
    tracing::info!(
        generator = service.summarizer().generator_name(),
        ocr = service.ocr().name(),
        strategy = ?config.ocr.strategy,
        "Service ready"
    );

    http::serve(&config.bind_addr(), Arc::new(service))
        .await
        .with_context(|| format!("Server error on {}", config.bind_addr()))
}
