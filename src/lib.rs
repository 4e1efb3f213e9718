//! buildcache - Build cache services
//!
//! Stores and retrieves build outputs keyed by content fingerprints, with
//! decorators that layer policies (such as read-only caching) over any
//! backend.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;

pub use error::{BuildCacheError, BuildCacheResult};
