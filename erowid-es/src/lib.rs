//! # erowid-es
//!
//! Elasticsearch side of erowid-search: builds the report query, talks to
//! the cluster, and projects hits into display results.
//!
//! ## Design
//!
//! - [`query`] turns a non-empty user string into a `_search` body with the
//!   body field boosted 7× over the title and `<b>` highlighting on both
//! - [`client`] sends that body to one fixed index and decodes the hits;
//!   it also bulk-loads report dumps
//! - [`projector`] maps hits to [`DisplayResult`]s, one per hit, in order
//!
//! Query construction and projection are pure. The only I/O is the single
//! HTTP call made by [`EsClient`].

pub mod client;
pub mod config;
pub mod error;
pub mod projector;
pub mod query;
pub mod types;

pub use client::{BulkSummary, EsClient};
pub use config::EsConfig;
pub use error::{EsError, Result};
pub use projector::{DisplayResult, Tag, TagLabel};
pub use query::{SearchQuery, SearchRequest};
pub use types::{ReportDocument, ReportId, SearchHit};

/// Search the report index and project the hits for display.
///
/// Builds a [`SearchRequest`] from `query`, sends it with `client`, and
/// returns one [`DisplayResult`] per hit in engine order.
///
/// # Errors
///
/// Returns whatever [`EsClient::search`] returns. Projection itself
/// cannot fail.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> erowid_es::Result<()> {
/// let client = erowid_es::EsClient::new(&erowid_es::EsConfig::default())?;
/// if let Some(query) = erowid_es::SearchQuery::new(Some("mushrooms".into())) {
///     for report in erowid_es::search(&client, query).await? {
///         println!("{} ({})", report.title, report.link);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(client: &EsClient, query: SearchQuery) -> Result<Vec<DisplayResult>> {
    let request = SearchRequest::new(query);
    let hits = client.search(&request).await?;
    Ok(projector::project(&hits))
}
