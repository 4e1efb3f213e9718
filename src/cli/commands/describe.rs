//! Describe command - show the active cache service

use crate::cache::create_service;
use crate::config::Config;
use crate::error::BuildCacheResult;
use console::style;

/// Execute the describe command
pub async fn execute(config: &Config) -> BuildCacheResult<()> {
    let service = create_service(&config.cache).await?;
    let push = if config.cache.push {
        style("push enabled").green()
    } else {
        style("push disabled").yellow()
    };
    println!("{} ({})", service.description(), push);
    super::finish(service, Ok(())).await
}
