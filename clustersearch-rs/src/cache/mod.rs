//! Client-side caches of search results.
//!
//! Each cache store holds previously fetched responses keyed by the query
//! document and its variables:
//! - The items store backs the direct search results table
//! - The related store backs the related resources tables and count cards
//!
//! The stores are not normalized; a delete has to be patched into each of
//! them separately (see [`reconcile`]).

mod reconcile;
mod snapshot;
mod types;

pub use reconcile::*;
pub use snapshot::CacheSnapshot;
pub use types::*;

use std::collections::BTreeMap;

/// Current snapshot format version. Increment when the format changes.
pub const CACHE_VERSION: u32 = 1;

/// A store of previously fetched search responses.
///
/// Reads never go to the network: a miss simply returns `None`.
pub trait ResultCache {
    /// Look up the entry cached for `key`.
    fn read(&self, key: &CacheKey) -> Option<CachedResultEntry>;

    /// Replace the entry cached for `key`.
    fn write(&mut self, key: CacheKey, entry: CachedResultEntry);
}

/// In-process result cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCache {
    entries: BTreeMap<CacheKey, CachedResultEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow an entry without cloning it.
    pub fn get(&self, key: &CacheKey) -> Option<&CachedResultEntry> {
        self.entries.get(key)
    }

    pub fn records(&self) -> Vec<CacheRecord> {
        self.entries
            .iter()
            .map(|(key, entry)| CacheRecord {
                key: key.clone(),
                entry: entry.clone(),
            })
            .collect()
    }
}

impl FromIterator<CacheRecord> for MemoryCache {
    fn from_iter<T: IntoIterator<Item = CacheRecord>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|r| (r.key, r.entry)).collect(),
        }
    }
}

impl ResultCache for MemoryCache {
    fn read(&self, key: &CacheKey) -> Option<CachedResultEntry> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: CacheKey, entry: CachedResultEntry) {
        self.entries.insert(key, entry);
    }
}
