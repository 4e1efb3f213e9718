//! Read-only cache policy
//!
//! Wraps any `BuildCacheService` and drops every store while leaving loads,
//! the description and `close` untouched. Callers get a plain
//! `BuildCacheService` and need no branching for "push disabled" builds.
//!
//! ## Usage
//!
//! ```ignore
//! use buildcache::cache::{InMemoryBuildCacheService, PushPreventingBuildCacheService};
//!
//! let service = PushPreventingBuildCacheService::new(Box::new(InMemoryBuildCacheService::new()));
//! ```

use crate::cache::entry::{BuildCacheEntryReader, BuildCacheEntryWriter};
use crate::cache::key::BuildCacheKey;
use crate::cache::service::BuildCacheService;
use crate::error::BuildCacheResult;
use async_trait::async_trait;
use tracing::debug;

/// Cache service that never pushes
///
/// Owns exactly one inner service. Suppressed stores succeed, so they never
/// trigger retries or fail the build.
pub struct PushPreventingBuildCacheService {
    delegate: Box<dyn BuildCacheService>,
}

impl PushPreventingBuildCacheService {
    pub fn new(delegate: Box<dyn BuildCacheService>) -> Self {
        Self { delegate }
    }

    /// Get a reference to the wrapped service
    pub fn inner(&self) -> &dyn BuildCacheService {
        self.delegate.as_ref()
    }
}

#[async_trait]
impl BuildCacheService for PushPreventingBuildCacheService {
    async fn load(
        &self,
        key: &BuildCacheKey,
        reader: &mut dyn BuildCacheEntryReader,
    ) -> BuildCacheResult<bool> {
        self.delegate.load(key, reader).await
    }

    async fn store(
        &self,
        key: &BuildCacheKey,
        _writer: &mut dyn BuildCacheEntryWriter,
    ) -> BuildCacheResult<()> {
        debug!(
            "Not storing cache entry with key {} because pushing to cache is disabled for the build",
            key
        );
        Ok(())
    }

    fn description(&self) -> String {
        self.delegate.description()
    }

    async fn close(&mut self) -> BuildCacheResult<()> {
        self.delegate.close().await
    }
}
