//! Elasticsearch connection settings.
//!
//! [`EsConfig`] names the cluster address and the index that holds the
//! reports. It deserialises from the `[search]` table of the application
//! config file; every field has a default.

use serde::{Deserialize, Serialize};

use crate::error::EsError;

/// Default Elasticsearch address, matching a local single-node cluster.
pub const DEFAULT_HOST: &str = "localhost:9200";

/// Index holding the experience reports.
pub const DEFAULT_INDEX: &str = "reports";

/// Environment variable that overrides [`EsConfig::host`].
pub const HOST_ENV_VAR: &str = "ES_HOST";

/// Configuration for the Elasticsearch client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsConfig {
    /// Cluster address. A bare `host:port` is accepted and treated as `http://`.
    pub host: String,
    /// Index name searched and written by the client.
    pub index: String,
    /// Per-request timeout in seconds. `None` keeps the HTTP client default
    /// (no timeout).
    pub timeout_seconds: Option<u64>,
    /// Custom User-Agent string. Defaults to `erowid-es/<version>`.
    pub user_agent: Option<String>,
}

impl Default for EsConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            index: DEFAULT_INDEX.to_owned(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

impl EsConfig {
    /// Replace `host` with the value of `ES_HOST` when `lookup` yields a
    /// non-empty value.
    ///
    /// The lookup is injected so callers can pass `std::env::var` and tests
    /// can pass a closure without touching the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV_VAR) {
            let host = host.trim();
            if !host.is_empty() {
                self.host = host.to_owned();
            }
        }
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `host` must be non-empty and parse as a URL once a scheme is added
    /// - `index` must be non-empty and contain no `/`
    /// - `timeout_seconds`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), EsError> {
        if self.host.trim().is_empty() {
            return Err(EsError::Config("host must not be empty".into()));
        }
        self.base_url()?;
        if self.index.is_empty() {
            return Err(EsError::Config("index must not be empty".into()));
        }
        if self.index.contains('/') {
            return Err(EsError::Config("index must not contain '/'".into()));
        }
        if self.timeout_seconds == Some(0) {
            return Err(EsError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The cluster base URL with a scheme and without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`EsError::Config`] if the host does not form a valid URL.
    pub fn base_url(&self) -> Result<String, EsError> {
        let host = self.host.trim();
        let with_scheme = if host.contains("://") {
            host.to_owned()
        } else {
            format!("http://{host}")
        };
        let parsed = url::Url::parse(&with_scheme)
            .map_err(|e| EsError::Config(format!("invalid host {host:?}: {e}")))?;
        Ok(parsed.as_str().trim_end_matches('/').to_owned())
    }
}
