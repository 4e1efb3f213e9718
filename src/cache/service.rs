//! Build cache service abstraction
//!
//! Provides a trait for cache operations that can be implemented by
//! storage backends (memory, local directory, remote HTTP) and by
//! decorators that wrap another service to add a policy.

use crate::cache::entry::{BuildCacheEntryReader, BuildCacheEntryWriter};
use crate::cache::key::BuildCacheKey;
use crate::error::BuildCacheResult;
use async_trait::async_trait;

/// Abstract build cache interface
///
/// Callers hold a `Box<dyn BuildCacheService>` and never need to know
/// whether it is a backend or a decorator chain ending in one.
#[async_trait]
pub trait BuildCacheService: Send + Sync {
    /// Load the entry for `key` into `reader`
    ///
    /// Returns `Ok(false)` on a miss without touching `reader`. Errors are
    /// reserved for backend failures, never for an ordinary miss.
    async fn load(
        &self,
        key: &BuildCacheKey,
        reader: &mut dyn BuildCacheEntryReader,
    ) -> BuildCacheResult<bool>;

    /// Persist the bytes produced by `writer` under `key`
    async fn store(
        &self,
        key: &BuildCacheKey,
        writer: &mut dyn BuildCacheEntryWriter,
    ) -> BuildCacheResult<()>;

    /// Human-readable identity of this service, for diagnostics
    fn description(&self) -> String;

    /// Release held resources
    ///
    /// The service counts as closed afterwards even if this returns an error.
    async fn close(&mut self) -> BuildCacheResult<()>;
}
