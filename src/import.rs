//! Loading a report dump into the search index.
//!
//! The dump is a single JSON array of report documents. Reports are sent
//! to the engine in fixed-size `_bulk` batches, one batch at a time.
//! Reports without a usable id are skipped rather than failing the run.

use erowid_es::{BulkSummary, EsClient, ReportDocument};
use indicatif::ProgressBar;
use std::path::Path;

use crate::error::{AppError, Result};

/// Reports per `_bulk` call.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Read and decode a dump file.
///
/// # Errors
///
/// Returns [`AppError::Io`] if the file cannot be read and
/// [`AppError::Import`] if it is not a JSON array of reports.
pub fn read_dump(path: &Path) -> Result<Vec<ReportDocument>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Import(format!("invalid dump {}: {e}", path.display())))
}

/// Index `reports` in batches of `batch_size`, advancing `progress` by one
/// per report.
///
/// Stops at the first batch that fails as a whole; per-report rejections
/// only show up in the returned counts.
///
/// # Errors
///
/// Returns [`AppError::Import`] for a zero batch size and
/// [`AppError::Search`] if a bulk call fails.
pub async fn import_reports(
    client: &EsClient,
    reports: &[ReportDocument],
    batch_size: usize,
    progress: &ProgressBar,
) -> Result<BulkSummary> {
    if batch_size == 0 {
        return Err(AppError::Import("batch size must be greater than 0".into()));
    }

    let mut summary = BulkSummary::default();
    for (batch_no, batch) in reports.chunks(batch_size).enumerate() {
        let outcome = client.bulk_index(batch).await?;
        if outcome.failed > 0 {
            tracing::warn!(batch = batch_no, failed = outcome.failed, "engine rejected reports");
        }
        summary.merge(outcome);
        progress.inc(batch.len() as u64);
    }
    Ok(summary)
}
