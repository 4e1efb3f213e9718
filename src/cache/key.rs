//! Cache key type

use crate::error::{BuildCacheError, BuildCacheResult};
use std::fmt;
use std::str::FromStr;

/// Identity of one cacheable artifact
///
/// Keys are produced upstream from the task fingerprint. This crate only
/// compares them, uses them to address entries, and prints them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildCacheKey(String);

impl BuildCacheKey {
    /// Wrap a fingerprint string
    ///
    /// Rejects empty keys and anything that is not safe to use as a single
    /// path or URL segment.
    pub fn new(hash: impl Into<String>) -> BuildCacheResult<Self> {
        let hash = hash.into();
        let valid = !hash.is_empty()
            && hash
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && hash != "."
            && hash != "..";
        if !valid {
            return Err(BuildCacheError::InvalidKey(hash));
        }
        Ok(Self(hash))
    }

    /// The fingerprint string
    pub fn hash_code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BuildCacheKey {
    type Err = BuildCacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
