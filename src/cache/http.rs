//! Remote HTTP cache backend
//!
//! Speaks the plain build cache protocol: `GET {url}/{key}` answers 200
//! with the entry or 404 on a miss, `PUT {url}/{key}` stores it. Requests
//! run on the blocking pool since `ureq` is synchronous.

use crate::cache::entry::{BuildCacheEntryReader, BuildCacheEntryWriter};
use crate::cache::key::BuildCacheKey;
use crate::cache::service::BuildCacheService;
use crate::error::{BuildCacheError, BuildCacheResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

const CONTENT_TYPE: &str = "application/octet-stream";

/// Status a server returns for entries over its size limit
const PAYLOAD_TOO_LARGE: u16 = 413;

/// Cache service backed by a remote HTTP server
pub struct HttpBuildCacheService {
    url: String,
    agent: ureq::Agent,
    closed: bool,
}

impl HttpBuildCacheService {
    /// Create a client for the cache rooted at `url`
    ///
    /// No request is made until the first load or store.
    pub fn new(url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Self {
            url: url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_config(config),
            closed: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn entry_url(&self, key: &BuildCacheKey) -> String {
        format!("{}/{}", self.url, key.hash_code())
    }

    fn ensure_open(&self) -> BuildCacheResult<()> {
        if self.closed {
            return Err(BuildCacheError::Closed(self.description()));
        }
        Ok(())
    }

    fn unreachable(url: &str, e: impl std::fmt::Display) -> BuildCacheError {
        BuildCacheError::RemoteUnreachable {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }

    fn get(agent: ureq::Agent, url: String) -> BuildCacheResult<Option<Vec<u8>>> {
        let mut response = agent
            .get(url.as_str())
            .call()
            .map_err(|e| Self::unreachable(&url, e))?;

        match response.status().as_u16() {
            200 => {
                let body = response
                    .body_mut()
                    .with_config()
                    .limit(u64::MAX)
                    .read_to_vec()
                    .map_err(|e| Self::unreachable(&url, e))?;
                Ok(Some(body))
            }
            404 => Ok(None),
            status => Err(BuildCacheError::Remote { url, status }),
        }
    }

    fn put(agent: ureq::Agent, url: String, data: Vec<u8>) -> BuildCacheResult<()> {
        let response = agent
            .put(url.as_str())
            .header("Content-Type", CONTENT_TYPE)
            .send(&data[..])
            .map_err(|e| Self::unreachable(&url, e))?;

        match response.status().as_u16() {
            status if (200..300).contains(&status) => Ok(()),
            PAYLOAD_TOO_LARGE => {
                info!(
                    "Cache entry at {} ({} bytes) exceeds the remote size limit, not stored",
                    url,
                    data.len()
                );
                Ok(())
            }
            status => Err(BuildCacheError::Remote { url, status }),
        }
    }
}

#[async_trait]
impl BuildCacheService for HttpBuildCacheService {
    async fn load(
        &self,
        key: &BuildCacheKey,
        reader: &mut dyn BuildCacheEntryReader,
    ) -> BuildCacheResult<bool> {
        self.ensure_open()?;

        let agent = self.agent.clone();
        let url = self.entry_url(key);
        let body = tokio::task::spawn_blocking(move || Self::get(agent, url))
            .await
            .map_err(|e| BuildCacheError::Internal(format!("remote load task failed: {}", e)))??;

        let Some(body) = body else {
            debug!("Cache miss for key: {}", key);
            return Ok(false);
        };

        let mut input: &[u8] = &body;
        reader
            .read_from(&mut input)
            .await
            .map_err(|e| BuildCacheError::Load {
                key: key.to_string(),
                service: self.description(),
                reason: e.to_string(),
            })?;
        debug!("Cache hit for key: {} ({} bytes)", key, body.len());
        Ok(true)
    }

    async fn store(
        &self,
        key: &BuildCacheKey,
        writer: &mut dyn BuildCacheEntryWriter,
    ) -> BuildCacheResult<()> {
        self.ensure_open()?;

        let mut data = Vec::with_capacity(usize::try_from(writer.size()).unwrap_or(0));
        writer
            .write_to(&mut data)
            .await
            .map_err(|e| BuildCacheError::Store {
                key: key.to_string(),
                service: self.description(),
                reason: e.to_string(),
            })?;

        let agent = self.agent.clone();
        let url = self.entry_url(key);
        tokio::task::spawn_blocking(move || Self::put(agent, url, data))
            .await
            .map_err(|e| BuildCacheError::Internal(format!("remote store task failed: {}", e)))??;

        debug!("Stored cache entry {}", key);
        Ok(())
    }

    fn description(&self) -> String {
        format!("HTTP cache at {}", self.url)
    }

    async fn close(&mut self) -> BuildCacheResult<()> {
        self.closed = true;
        Ok(())
    }
}
