//! CLI command implementations

pub mod config;
pub mod describe;
pub mod load;
pub mod store;

pub use config::execute as config;
pub use describe::execute as describe;
pub use load::execute as load;
pub use store::execute as store;

use crate::cache::BuildCacheService;
use crate::error::BuildCacheResult;

/// Close `service` whatever `result` is, preferring the command's own error
pub(crate) async fn finish<T>(
    mut service: Box<dyn BuildCacheService>,
    result: BuildCacheResult<T>,
) -> BuildCacheResult<T> {
    let closed = service.close().await;
    let value = result?;
    closed?;
    Ok(value)
}
