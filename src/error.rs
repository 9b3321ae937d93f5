//! Error types for the web front-end.
//!
//! Every failure inside a request collapses into one user-visible answer:
//! `500 Something went wrong.` The full error goes to the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Body of every failed request.
pub const FAILURE_BODY: &str = "Something went wrong.";

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The engine call failed (network, status, or decoding).
    #[error("search error: {0}")]
    Search(#[from] erowid_es::EsError),

    /// Configuration could not be read or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// A report dump could not be loaded or indexed.
    #[error("import error: {0}")]
    Import(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "search flow failed");
        (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_BODY).into_response()
    }
}
