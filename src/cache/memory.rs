//! In-memory cache backend
//!
//! Keeps entries in a map for the lifetime of the process. Used for tests
//! and for throwaway builds that only need intra-process reuse.

use crate::cache::entry::{BuildCacheEntryReader, BuildCacheEntryWriter};
use crate::cache::key::BuildCacheKey;
use crate::cache::service::BuildCacheService;
use crate::error::{BuildCacheError, BuildCacheResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

const DESCRIPTION: &str = "in-memory cache";

/// Map-backed cache service
#[derive(Default)]
pub struct InMemoryBuildCacheService {
    entries: RwLock<HashMap<BuildCacheKey, Vec<u8>>>,
}

impl InMemoryBuildCacheService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry directly, bypassing `store`
    pub fn insert(&self, key: BuildCacheKey, data: Vec<u8>) -> BuildCacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key, data);
        Ok(())
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> BuildCacheError {
        BuildCacheError::Internal("in-memory cache lock poisoned".to_string())
    }
}

#[async_trait]
impl BuildCacheService for InMemoryBuildCacheService {
    async fn load(
        &self,
        key: &BuildCacheKey,
        reader: &mut dyn BuildCacheEntryReader,
    ) -> BuildCacheResult<bool> {
        // Copy out so the lock is not held across the reader's await
        let data = {
            let entries = self.entries.read().map_err(|_| Self::poisoned())?;
            entries.get(key).cloned()
        };

        let Some(data) = data else {
            debug!("Cache miss for key: {}", key);
            return Ok(false);
        };

        let mut input: &[u8] = &data;
        reader
            .read_from(&mut input)
            .await
            .map_err(|e| BuildCacheError::io(format!("reading cache entry {}", key), e))?;
        debug!("Cache hit for key: {}", key);
        Ok(true)
    }

    async fn store(
        &self,
        key: &BuildCacheKey,
        writer: &mut dyn BuildCacheEntryWriter,
    ) -> BuildCacheResult<()> {
        let mut data = Vec::with_capacity(usize::try_from(writer.size()).unwrap_or(0));
        writer
            .write_to(&mut data)
            .await
            .map_err(|e| BuildCacheError::Store {
                key: key.to_string(),
                service: DESCRIPTION.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Stored {} bytes for key: {}", data.len(), key);
        self.entries
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(key.clone(), data);
        Ok(())
    }

    fn description(&self) -> String {
        DESCRIPTION.to_string()
    }

    async fn close(&mut self) -> BuildCacheResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::{BytesEntryReader, BytesEntryWriter};

    fn key(hash: &str) -> BuildCacheKey {
        BuildCacheKey::new(hash).unwrap()
    }

    #[tokio::test]
    async fn store_then_load() {
        let service = InMemoryBuildCacheService::new();
        let mut writer = BytesEntryWriter::new(b"jar bytes".to_vec());
        service.store(&key("k1"), &mut writer).await.unwrap();

        let mut reader = BytesEntryReader::new();
        assert!(service.load(&key("k1"), &mut reader).await.unwrap());
        assert_eq!(reader.bytes(), b"jar bytes");
        assert_eq!(service.len(), 1);
    }

    #[tokio::test]
    async fn miss_returns_false() {
        let service = InMemoryBuildCacheService::new();
        let mut reader = BytesEntryReader::new();
        assert!(!service.load(&key("k1"), &mut reader).await.unwrap());
        assert!(reader.bytes().is_empty());
        assert!(service.is_empty());
    }

    #[tokio::test]
    async fn store_overwrites() {
        let service = InMemoryBuildCacheService::new();
        service.insert(key("k1"), vec![1]).unwrap();
        let mut writer = BytesEntryWriter::new(vec![2]);
        service.store(&key("k1"), &mut writer).await.unwrap();

        let mut reader = BytesEntryReader::new();
        service.load(&key("k1"), &mut reader).await.unwrap();
        assert_eq!(reader.bytes(), &[2]);
    }

    #[test]
    fn insert_reports_poisoned_lock() {
        let service = std::sync::Arc::new(InMemoryBuildCacheService::new());
        let poisoner = std::sync::Arc::clone(&service);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err = service.insert(key("k1"), vec![1]).unwrap_err();
        assert!(matches!(err, BuildCacheError::Internal(_)));
    }
}
