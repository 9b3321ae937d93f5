//! erowid-search: a small web front-end for searching Erowid experience
//! reports stored in Elasticsearch.
//!
//! # Architecture
//!
//! ```text
//! GET /search?q=… ──► SearchRequest ──► Elasticsearch ──► DisplayResult[] ──► HTML
//! ```
//!
//! Query building, the engine client and result projection live in the
//! `erowid-es` crate. This crate adds the HTTP surface ([`server`]), page
//! rendering ([`render`]), configuration ([`config`]) and the dump
//! importer ([`import`]).

pub mod config;
pub mod error;
pub mod import;
pub mod render;
pub mod server;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use server::Server;
