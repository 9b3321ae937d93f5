//! Configuration types for the web front-end.
//!
//! Everything has a default, so running without a config file gives a
//! server on port 8080 talking to `localhost:9200`. A TOML file may
//! override any field; `ES_HOST` in the environment wins over the file.

use erowid_es::EsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Elasticsearch connection settings.
    pub search: EsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind. `0` asks the OS for a free port.
    pub port: u16,
    /// Directory served for every path that is not a route.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8080,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the effective configuration for a process.
    ///
    /// Reads `path` if given (defaults otherwise), applies environment
    /// overrides through `lookup`, and validates the result.
    pub fn load<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.search.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Check both sections.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Config("server.host must not be empty".into()));
        }
        self.search
            .validate()
            .map_err(|e| AppError::Config(format!("search: {e}")))
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, PathBuf::from("static"));
        assert_eq!(config.search.host, "localhost:9200");
        assert_eq!(config.search.index, "reports");
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.server.port = 9090;
        config.search.host = "es.internal:9200".into();
        config.search.timeout_seconds = Some(5);
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [search]
            index = "reports_v2"
            "#,
        )
        .unwrap();
        assert_eq!(config.search.index, "reports_v2");
        assert_eq!(config.search.host, "localhost:9200");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = AppConfig::from_file(Path::new("/nonexistent/erowid-search.toml"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let config = AppConfig::load(None, no_env).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn env_host_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nhost = \"from-file:9200\"\n").unwrap();

        let config = AppConfig::load(Some(&path), |key| {
            (key == "ES_HOST").then(|| "from-env:9200".to_owned())
        })
        .unwrap();
        assert_eq!(config.search.host, "from-env:9200");
    }

    #[test]
    fn load_rejects_invalid_search_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nindex = \"\"\n").unwrap();

        let err = AppConfig::load(Some(&path), no_env).unwrap_err();
        assert!(err.to_string().contains("index"));
    }

    #[test]
    fn empty_server_host_rejected() {
        let mut config = AppConfig::default();
        config.server.host = " ".into();
        assert!(config.validate().is_err());
    }
}
