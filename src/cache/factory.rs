//! Service factory
//!
//! Builds the configured backend and layers policy decorators over it.

use crate::cache::directory::DirectoryBuildCacheService;
use crate::cache::http::HttpBuildCacheService;
use crate::cache::memory::InMemoryBuildCacheService;
use crate::cache::push_preventing::PushPreventingBuildCacheService;
use crate::cache::service::BuildCacheService;
use crate::config::{BackendKind, CacheConfig};
use crate::error::{BuildCacheError, BuildCacheResult};
use std::time::Duration;
use tracing::debug;

/// Create the cache service described by `config`
///
/// With `push = false` the backend is wrapped in a
/// [`PushPreventingBuildCacheService`], so callers never branch on it.
pub async fn create_service(config: &CacheConfig) -> BuildCacheResult<Box<dyn BuildCacheService>> {
    let backend: Box<dyn BuildCacheService> = match config.backend {
        BackendKind::Memory => Box::new(InMemoryBuildCacheService::new()),
        BackendKind::Directory => {
            Box::new(DirectoryBuildCacheService::open(&config.directory).await?)
        }
        BackendKind::Http => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| BuildCacheError::BackendMisconfigured {
                    backend: config.backend.to_string(),
                    setting: "cache.url".to_string(),
                })?;
            Box::new(HttpBuildCacheService::new(
                url,
                Duration::from_secs(config.timeout_secs),
            ))
        }
    };

    if config.push {
        debug!("Using {}", backend.description());
        return Ok(backend);
    }

    debug!("Using {} (push disabled)", backend.description());
    Ok(Box::new(PushPreventingBuildCacheService::new(backend)))
}
