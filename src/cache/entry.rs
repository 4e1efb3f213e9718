//! Streaming access to cache entry contents
//!
//! A service never sees where the bytes of an entry come from or where they
//! end up. `load` hands matched bytes to a [`BuildCacheEntryReader`];
//! `store` pulls the bytes to persist out of a [`BuildCacheEntryWriter`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Sink for the bytes of a cache hit
#[async_trait]
pub trait BuildCacheEntryReader: Send {
    /// Consume the entry from `input`
    async fn read_from(&mut self, input: &mut (dyn AsyncRead + Send + Unpin))
        -> std::io::Result<()>;
}

/// Source of the bytes for a cache store
#[async_trait]
pub trait BuildCacheEntryWriter: Send {
    /// Write the entry into `output`
    async fn write_to(&mut self, output: &mut (dyn AsyncWrite + Send + Unpin))
        -> std::io::Result<()>;

    /// Number of bytes `write_to` will produce
    fn size(&self) -> u64;
}

/// Reader that buffers the entry in memory
#[derive(Debug, Default)]
pub struct BytesEntryReader {
    data: Vec<u8>,
}

impl BytesEntryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[async_trait]
impl BuildCacheEntryReader for BytesEntryReader {
    async fn read_from(
        &mut self,
        input: &mut (dyn AsyncRead + Send + Unpin),
    ) -> std::io::Result<()> {
        self.data.clear();
        input.read_to_end(&mut self.data).await?;
        Ok(())
    }
}

/// Writer backed by an in-memory buffer
#[derive(Debug, Clone)]
pub struct BytesEntryWriter {
    data: Vec<u8>,
}

impl BytesEntryWriter {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl BuildCacheEntryWriter for BytesEntryWriter {
    async fn write_to(
        &mut self,
        output: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> std::io::Result<()> {
        output.write_all(&self.data).await?;
        output.flush().await
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Writer that streams a file from disk
///
/// The file is opened lazily in `write_to`, so a writer that is never
/// consumed never holds a file handle.
#[derive(Debug, Clone)]
pub struct FileEntryWriter {
    path: PathBuf,
    size: u64,
}

impl FileEntryWriter {
    /// Describe `path` as the entry source, recording its current size
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BuildCacheEntryWriter for FileEntryWriter {
    async fn write_to(
        &mut self,
        output: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> std::io::Result<()> {
        let mut file = tokio::fs::File::open(&self.path).await?;
        tokio::io::copy(&mut file, output).await?;
        output.flush().await
    }

    fn size(&self) -> u64 {
        self.size
    }
}
