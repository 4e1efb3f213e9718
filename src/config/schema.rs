//! Configuration schema for buildcache
//!
//! Configuration is stored at `~/.config/buildcache/config.toml`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Which storage backend serves the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Entries kept in process memory
    Memory,
    /// Entries stored in a local directory
    Directory,
    /// Entries stored on a remote HTTP cache
    Http,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Directory => "directory",
            Self::Http => "http",
        };
        write!(f, "{}", name)
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Storage backend
    pub backend: BackendKind,

    /// Upload new entries (false = read-only cache)
    pub push: bool,

    /// Directory for the directory backend
    pub directory: PathBuf,

    /// Base URL for the http backend
    pub url: Option<String>,

    /// Request timeout for the http backend
    pub timeout_secs: u64,
}

impl CacheConfig {
    /// Default location of the local cache directory
    pub fn default_directory() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("buildcache")
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Directory,
            push: true,
            directory: Self::default_directory(),
            url: None,
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("backend = \"directory\""));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.cache.backend, BackendKind::Directory);
        assert!(config.cache.push);
        assert_eq!(config.cache.timeout_secs, 30);
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [cache]
            backend = "http"
            push = false
            url = "https://cache.example.com/cache/"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.backend, BackendKind::Http);
        assert!(!config.cache.push);
        assert_eq!(config.general.log_format, "text"); // default preserved
    }

    #[test]
    fn unknown_backend_rejected() {
        let toml = r#"
            [cache]
            backend = "s3"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }
}
