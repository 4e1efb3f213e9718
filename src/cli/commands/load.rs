//! Load command - fetch a cache entry

use crate::cache::{create_service, BuildCacheService, BytesEntryReader};
use crate::cli::args::LoadArgs;
use crate::config::Config;
use crate::error::{BuildCacheError, BuildCacheResult};
use console::style;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Execute the load command
pub async fn execute(args: LoadArgs, config: &Config) -> BuildCacheResult<()> {
    let service = create_service(&config.cache).await?;
    let result = load(service.as_ref(), &args).await;
    super::finish(service, result).await
}

async fn load(service: &dyn BuildCacheService, args: &LoadArgs) -> BuildCacheResult<()> {
    let mut reader = BytesEntryReader::new();
    if !service.load(&args.key, &mut reader).await? {
        eprintln!("{} {}", style("Cache miss:").yellow(), args.key);
        return Ok(());
    }

    let data = reader.into_bytes();
    info!("Loaded {} ({} bytes) from {}", args.key, data.len(), service.description());

    match args.output {
        Some(ref path) => tokio::fs::write(path, &data)
            .await
            .map_err(|e| BuildCacheError::io(format!("writing {}", path.display()), e)),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&data)
                .await
                .map_err(|e| BuildCacheError::io("writing to stdout", e))?;
            stdout
                .flush()
                .await
                .map_err(|e| BuildCacheError::io("writing to stdout", e))
        }
    }
}
