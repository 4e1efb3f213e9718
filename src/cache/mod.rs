//! Build cache services
//!
//! A build tool talks to its cache through the [`BuildCacheService`] trait.
//! Backends store entries; decorators wrap another service and change one
//! aspect of its behavior while forwarding the rest.
//!
//! | Service | Kind | Notes |
//! |---------|------|-------|
//! | [`InMemoryBuildCacheService`] | backend | process lifetime only |
//! | [`DirectoryBuildCacheService`] | backend | checksummed, atomic publish |
//! | [`HttpBuildCacheService`] | backend | `GET`/`PUT {url}/{key}` |
//! | [`PushPreventingBuildCacheService`] | decorator | drops every store |

pub mod directory;
pub mod entry;
mod factory;
pub mod http;
pub mod key;
pub mod memory;
pub mod push_preventing;
mod service;

pub use directory::DirectoryBuildCacheService;
pub use entry::{
    BuildCacheEntryReader, BuildCacheEntryWriter, BytesEntryReader, BytesEntryWriter,
    FileEntryWriter,
};
pub use factory::create_service;
pub use http::HttpBuildCacheService;
pub use key::BuildCacheKey;
pub use memory::InMemoryBuildCacheService;
pub use push_preventing::PushPreventingBuildCacheService;
pub use service::BuildCacheService;
