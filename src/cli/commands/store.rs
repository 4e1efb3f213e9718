//! Store command - push a file into the cache

use crate::cache::{create_service, BuildCacheEntryWriter, FileEntryWriter};
use crate::cli::args::StoreArgs;
use crate::config::Config;
use crate::error::{BuildCacheError, BuildCacheResult};
use std::io::ErrorKind;
use tracing::info;

/// Execute the store command
pub async fn execute(args: StoreArgs, config: &Config) -> BuildCacheResult<()> {
    let mut writer = FileEntryWriter::open(&args.file).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            BuildCacheError::PathNotFound(args.file.clone())
        } else {
            BuildCacheError::io(format!("reading {}", args.file.display()), e)
        }
    })?;

    let service = create_service(&config.cache).await?;
    let result = service.store(&args.key, &mut writer).await;
    if result.is_ok() {
        info!("Stored {} ({} bytes) via {}", args.key, writer.size(), service.description());
    }
    super::finish(service, result).await
}
