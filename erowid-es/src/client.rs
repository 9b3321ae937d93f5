//! HTTP client for the Elasticsearch REST API.
//!
//! Wraps a configured [`reqwest::Client`] and the target index. Only two
//! endpoints are used: `_search` for queries and `_bulk` for imports.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::EsConfig;
use crate::error::{EsError, Result};
use crate::query::SearchRequest;
use crate::types::{ReportDocument, SearchHit, SearchResponse};

/// Longest error body kept in [`EsError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Outcome of a bulk import call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
    /// Documents the engine accepted.
    pub indexed: usize,
    /// Documents never sent because they had no usable report id.
    pub skipped: usize,
    /// Documents the engine rejected.
    pub failed: usize,
}

impl BulkSummary {
    /// Add another batch's counts to this one.
    pub fn merge(&mut self, other: BulkSummary) {
        self.indexed += other.indexed;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    /// Total documents seen.
    pub fn total(&self) -> usize {
        self.indexed + self.skipped + self.failed
    }
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(default)]
    status: u16,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Elasticsearch client bound to one index.
#[derive(Debug, Clone)]
pub struct EsClient {
    http: reqwest::Client,
    base_url: String,
    index: String,
}

impl EsClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EsError::Config`] if the configuration is invalid, or
    /// [`EsError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: &EsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http: build_http_client(config)?,
            base_url: config.base_url()?,
            index: config.index.clone(),
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run `request` against the index and return the hits in engine order.
    ///
    /// # Errors
    ///
    /// - [`EsError::Http`] if the request cannot be sent or the body read
    /// - [`EsError::Status`] for any non-2xx response
    /// - [`EsError::Decode`] if the body is not a `_search` response
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        tracing::trace!(query = request.query_text(), "sending search");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| EsError::Http(format!("search request failed: {e}")))?;

        let body = read_success_body(response).await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| EsError::Decode(format!("invalid search response: {e}")))?;

        tracing::debug!(index = %self.index, hits = parsed.hits.hits.len(), "search completed");
        Ok(parsed.hits.hits)
    }

    /// Index `docs` in one `_bulk` call, using each report's id as `_id`.
    ///
    /// Documents whose `meta.erowidId` is missing or zero are skipped. If
    /// every document is skipped no request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the call as a whole fails. Per-document
    /// rejections are counted in [`BulkSummary::failed`] instead.
    pub async fn bulk_index(&self, docs: &[ReportDocument]) -> Result<BulkSummary> {
        let mut summary = BulkSummary::default();
        let mut payload = String::new();
        let mut sent = 0usize;

        for doc in docs {
            let Some(id) = doc.meta.erowid_id.as_ref().filter(|id| !id.is_unset()) else {
                summary.skipped += 1;
                continue;
            };
            let action = serde_json::json!({
                "index": { "_index": self.index, "_id": id.to_string() }
            });
            let source = serde_json::to_string(doc)
                .map_err(|e| EsError::Decode(format!("failed to encode report {id}: {e}")))?;
            payload.push_str(&action.to_string());
            payload.push('\n');
            payload.push_str(&source);
            payload.push('\n');
            sent += 1;
        }

        if sent == 0 {
            return Ok(summary);
        }

        let url = format!("{}/_bulk", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(payload)
            .send()
            .await
            .map_err(|e| EsError::Http(format!("bulk request failed: {e}")))?;

        let body = read_success_body(response).await?;
        let parsed: BulkResponse = serde_json::from_str(&body)
            .map_err(|e| EsError::Decode(format!("invalid bulk response: {e}")))?;

        let failed = if parsed.errors {
            parsed
                .items
                .iter()
                .flat_map(|entry| entry.values())
                .filter(|item| item.error.is_some() || item.status >= 300)
                .count()
        } else {
            0
        };
        summary.failed = failed;
        summary.indexed = sent.saturating_sub(failed);

        tracing::debug!(
            index = %self.index,
            indexed = summary.indexed,
            skipped = summary.skipped,
            failed = summary.failed,
            "bulk batch completed"
        );
        Ok(summary)
    }
}

/// Read the body of a 2xx response, or turn anything else into [`EsError::Status`].
async fn read_success_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| EsError::Http(format!("failed to read response body: {e}")))?;

    if !status.is_success() {
        return Err(EsError::Status {
            status: status.as_u16(),
            body: truncate(&body, MAX_ERROR_BODY),
        });
    }
    Ok(body)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_owned(),
    }
}

/// Build the [`reqwest::Client`] used for every engine call.
fn build_http_client(config: &EsConfig) -> Result<reqwest::Client> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => format!("erowid-es/{}", env!("CARGO_PKG_VERSION")),
    };

    let mut builder = reqwest::Client::builder().user_agent(ua);
    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| EsError::Http(format!("failed to build HTTP client: {e}")))
}
