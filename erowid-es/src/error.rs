//! Error types for the erowid-es crate.
//!
//! Messages are stable strings meant for operator logs. They never include
//! the request body, so user queries stay out of error text.

/// Errors that can occur while talking to Elasticsearch.
#[derive(Debug, thiserror::Error)]
pub enum EsError {
    /// The HTTP request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Elasticsearch answered with a non-success status code.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code returned by the engine.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for erowid-es results.
pub type Result<T> = std::result::Result<T, EsError>;
