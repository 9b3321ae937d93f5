//! `erowid-import`: load a JSON report dump into the search index.

use clap::Parser;
use erowid_es::EsClient;
use erowid_search::AppConfig;
use erowid_search::import::{DEFAULT_BATCH_SIZE, import_reports, read_dump};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bulk-index an Erowid report dump into Elasticsearch.
#[derive(Parser)]
#[command(name = "erowid-import", version, about)]
struct Cli {
    /// JSON file holding an array of reports.
    #[arg(short, long)]
    dump: PathBuf,

    /// Reports per bulk request.
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Path to TOML configuration file (only `[search]` is used).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("erowid_search=info,erowid_es=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    let client = EsClient::new(&config.search)?;

    let reports = read_dump(&cli.dump)?;
    tracing::info!(
        reports = reports.len(),
        dump = %cli.dump.display(),
        index = %client.index(),
        "importing reports"
    );

    let pb = ProgressBar::new(reports.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("  Indexing [{bar:30}] {pos}/{len} ETA {eta}") {
        pb.set_style(style);
    }

    let summary = import_reports(&client, &reports, cli.batch_size, &pb).await?;
    pb.finish_and_clear();

    tracing::info!(
        indexed = summary.indexed,
        skipped = summary.skipped,
        failed = summary.failed,
        "import finished"
    );
    if summary.failed > 0 {
        anyhow::bail!("{} reports were rejected by the engine", summary.failed);
    }
    Ok(())
}
