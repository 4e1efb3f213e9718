//! Local directory cache backend
//!
//! Each entry lives in a single file `<root>/<key>`: the payload followed by
//! the hex SHA256 of the payload. Stores write a temp file and publish it
//! with one rename, so readers see either the previous entry or the new one,
//! never a mix. Loads verify the checksum before handing bytes out.

use crate::cache::entry::{BuildCacheEntryReader, BuildCacheEntryWriter};
use crate::cache::key::BuildCacheKey;
use crate::cache::service::BuildCacheService;
use crate::error::{BuildCacheError, BuildCacheResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};
use uuid::Uuid;

/// Length of the hex SHA256 trailer
const CHECKSUM_LEN: usize = 64;
const TEMP_PREFIX: &str = ".tmp-";

/// Cache service backed by a local directory
///
/// Several instances, in one process or many, may share a root. Each one
/// only ever removes temp files it created itself.
pub struct DirectoryBuildCacheService {
    root: PathBuf,
    closed: bool,
}

impl DirectoryBuildCacheService {
    /// Open (and create if needed) the cache directory
    pub async fn open(root: impl Into<PathBuf>) -> BuildCacheResult<Self> {
        let root = root.into();
        debug!("Opening directory cache at: {}", root.display());
        fs::create_dir_all(&root).await.map_err(|e| {
            BuildCacheError::io(format!("creating cache directory {}", root.display()), e)
        })?;
        Ok(Self {
            root,
            closed: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &BuildCacheKey) -> PathBuf {
        self.root.join(key.hash_code())
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(format!("{}{}", TEMP_PREFIX, Uuid::new_v4()))
    }

    fn ensure_open(&self) -> BuildCacheResult<()> {
        if self.closed {
            return Err(BuildCacheError::Closed(self.description()));
        }
        Ok(())
    }

    fn load_error(&self, key: &BuildCacheKey, e: std::io::Error) -> BuildCacheError {
        BuildCacheError::Load {
            key: key.to_string(),
            service: self.description(),
            reason: e.to_string(),
        }
    }

    fn store_error(&self, key: &BuildCacheKey, e: std::io::Error) -> BuildCacheError {
        BuildCacheError::Store {
            key: key.to_string(),
            service: self.description(),
            reason: e.to_string(),
        }
    }

    /// Write payload plus checksum trailer to `temp`
    async fn write_temp_file(
        temp: &Path,
        writer: &mut dyn BuildCacheEntryWriter,
    ) -> std::io::Result<()> {
        let file = fs::File::create(temp).await?;
        let mut hashing = HashingWriter::new(file);
        writer.write_to(&mut hashing).await?;
        hashing.flush().await?;
        let (mut file, checksum) = hashing.finish();
        file.write_all(checksum.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await
    }
}

#[async_trait]
impl BuildCacheService for DirectoryBuildCacheService {
    async fn load(
        &self,
        key: &BuildCacheKey,
        reader: &mut dyn BuildCacheEntryReader,
    ) -> BuildCacheResult<bool> {
        self.ensure_open()?;

        let data = match fs::read(self.entry_path(key)).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss for key: {}", key);
                return Ok(false);
            }
            Err(e) => return Err(self.load_error(key, e)),
        };

        let Some(split) = data.len().checked_sub(CHECKSUM_LEN) else {
            return Err(BuildCacheError::Corrupted {
                key: key.to_string(),
                expected: "<missing>".to_string(),
                actual: hex::encode(Sha256::digest(&data)),
            });
        };
        let (payload, trailer) = data.split_at(split);
        let expected = String::from_utf8_lossy(trailer).to_string();
        let actual = hex::encode(Sha256::digest(payload));
        if expected != actual {
            return Err(BuildCacheError::Corrupted {
                key: key.to_string(),
                expected,
                actual,
            });
        }

        let mut input: &[u8] = payload;
        reader
            .read_from(&mut input)
            .await
            .map_err(|e| self.load_error(key, e))?;
        debug!("Cache hit for key: {} ({} bytes)", key, payload.len());
        Ok(true)
    }

    async fn store(
        &self,
        key: &BuildCacheKey,
        writer: &mut dyn BuildCacheEntryWriter,
    ) -> BuildCacheResult<()> {
        self.ensure_open()?;

        let temp = self.temp_path();
        let published = match Self::write_temp_file(&temp, writer).await {
            Ok(()) => fs::rename(&temp, self.entry_path(key)).await,
            Err(e) => Err(e),
        };
        if let Err(e) = published {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                debug!("Could not remove {}: {}", temp.display(), cleanup);
            }
            return Err(self.store_error(key, e));
        }

        debug!("Stored cache entry {} ({} bytes)", key, writer.size());
        Ok(())
    }

    fn description(&self) -> String {
        format!("local directory cache at {}", self.root.display())
    }

    async fn close(&mut self) -> BuildCacheResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        info!("Closed {}", self.description());
        Ok(())
    }
}

/// `AsyncWrite` adapter that hashes everything passing through it
struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
}

impl<W> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finish(self) -> (W, String) {
        (self.inner, hex::encode(self.hasher.finalize()))
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for HashingWriter<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        let this = &mut *self;
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                this.hasher.update(&buf[..n]);
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
