//! Error types for buildcache
//!
//! All modules use `BuildCacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for build cache operations
pub type BuildCacheResult<T> = Result<T, BuildCacheError>;

/// All errors that can occur in buildcache
#[derive(Error, Debug)]
pub enum BuildCacheError {
    // Cache operation errors
    #[error("Could not load entry {key} from {service}: {reason}")]
    Load {
        key: String,
        service: String,
        reason: String,
    },

    #[error("Could not store entry {key} in {service}: {reason}")]
    Store {
        key: String,
        service: String,
        reason: String,
    },

    #[error("Cache entry {key} is corrupted: expected checksum {expected}, found {actual}")]
    Corrupted {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Remote cache at {url} responded with HTTP {status}")]
    Remote { url: String, status: u16 },

    #[error("Remote cache at {url} is unreachable: {reason}")]
    RemoteUnreachable { url: String, reason: String },

    #[error("Cache service already closed: {0}")]
    Closed(String),

    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache backend {backend} requires {setting} to be set")]
    BackendMisconfigured { backend: String, setting: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BuildCacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RemoteUnreachable { .. } => true,
            Self::Remote { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Corrupted { .. } => Some("Remove the entry from the cache directory and rebuild"),
            Self::RemoteUnreachable { .. } => {
                Some("Check cache.url, or run with --no-push and a local backend")
            }
            Self::BackendMisconfigured { .. } => Some("Run: buildcache config path"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = BuildCacheError::Remote {
            url: "https://cache.example.com".to_string(),
            status: 503,
        };
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn error_hint() {
        let err = BuildCacheError::BackendMisconfigured {
            backend: "http".to_string(),
            setting: "cache.url".to_string(),
        };
        assert_eq!(err.hint(), Some("Run: buildcache config path"));
        assert_eq!(BuildCacheError::Closed("x".to_string()).hint(), None);
    }

    #[test]
    fn error_retryable() {
        let unavailable = BuildCacheError::Remote {
            url: "u".to_string(),
            status: 503,
        };
        let forbidden = BuildCacheError::Remote {
            url: "u".to_string(),
            status: 403,
        };
        assert!(unavailable.is_retryable());
        assert!(!forbidden.is_retryable());
        assert!(!BuildCacheError::Closed("x".to_string()).is_retryable());
    }
}
