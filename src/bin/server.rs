//! `erowid-search`: serve the search front-end.

use clap::Parser;
use erowid_search::AppConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Full-text search front-end for Erowid experience reports.
#[derive(Parser)]
#[command(name = "erowid-search", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("erowid_search=info,erowid_es=info,tower_http=info")
        }))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), |key| std::env::var(key).ok())?;

    erowid_search::server::run(&config).await.map_err(|e| {
        tracing::error!(error = %e, "erowid-search exited with error");
        anyhow::anyhow!("erowid-search failed: {e}")
    })
}
