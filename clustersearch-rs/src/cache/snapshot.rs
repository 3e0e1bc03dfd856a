//! On-disk snapshot of both result cache stores.
//!
//! Writers hold `<snapshot>.lock` for the whole read-patch-write cycle
//! ([`CacheSnapshot::update`]), so two concurrent reconciles cannot lose
//! each other's changes. The file itself is replaced by renaming a sibling
//! temp file over it.

use super::types::CacheRecord;
use super::{MemoryCache, CACHE_VERSION};
use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::debug;

const LOCK_ATTEMPTS: u32 = 50;
const LOCK_RETRY: Duration = Duration::from_millis(100);

/// Serialized form of the items store and the related store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// Snapshot format version.
    pub version: u32,
    /// Entries of the direct search results store.
    #[serde(default)]
    pub items: Vec<CacheRecord>,
    /// Entries of the related resources store.
    #[serde(default)]
    pub related: Vec<CacheRecord>,
}

impl Default for CacheSnapshot {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            items: Vec::new(),
            related: Vec::new(),
        }
    }
}

impl CacheSnapshot {
    /// Capture the current content of both stores.
    pub fn from_stores(items: &MemoryCache, related: &MemoryCache) -> Self {
        Self {
            version: CACHE_VERSION,
            items: items.records(),
            related: related.records(),
        }
    }

    /// Split the snapshot into the items store and the related store.
    pub fn into_stores(self) -> (MemoryCache, MemoryCache) {
        (
            self.items.into_iter().collect(),
            self.related.into_iter().collect(),
        )
    }

    /// Load a snapshot from disk.
    ///
    /// A snapshot written by a different format version is treated as empty.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SearchError::SnapshotNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SearchError::CacheError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let snapshot: CacheSnapshot = serde_json::from_str(&content).map_err(|e| {
            SearchError::CacheError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        if snapshot.version != CACHE_VERSION {
            debug!(
                found = snapshot.version,
                expected = CACHE_VERSION,
                "Ignoring outdated cache snapshot"
            );
            return Ok(Self::default());
        }

        Ok(snapshot)
    }

    /// Load a snapshot, reading a missing file as two empty stores.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(SearchError::SnapshotNotFound(_)) => {
                debug!(path = %path.display(), "No cache snapshot, starting empty");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Write the snapshot to disk under the snapshot lock.
    pub fn save(&self, path: &Path) -> Result<()> {
        let _lock = SnapshotLock::acquire(path)?;
        self.write_to(path)
    }

    /// Patch both stores of the snapshot at `path` while holding its lock.
    ///
    /// A missing snapshot is patched as empty stores. The file is only
    /// written when `patch` changed a store.
    pub fn update<T>(
        path: &Path,
        patch: impl FnOnce(&mut MemoryCache, &mut MemoryCache) -> T,
    ) -> Result<T> {
        let _lock = SnapshotLock::acquire(path)?;
        let (mut items, mut related) = Self::load_or_empty(path)?.into_stores();
        let (items_before, related_before) = (items.clone(), related.clone());

        let result = patch(&mut items, &mut related);

        if items != items_before || related != related_before {
            Self::from_stores(&items, &related).write_to(path)?;
        } else {
            debug!(path = %path.display(), "Cache snapshot unchanged");
        }
        Ok(result)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            SearchError::CacheError(format!("Failed to serialize snapshot: {}", e))
        })?;
        replace_file(path, content.as_bytes())?;
        debug!(
            path = %path.display(),
            items = self.items.len(),
            related = self.related.len(),
            "Saved cache snapshot"
        );
        Ok(())
    }
}

/// Path with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Exclusive hold on a snapshot file, released on drop.
#[derive(Debug)]
struct SnapshotLock {
    path: PathBuf,
}

impl SnapshotLock {
    fn acquire(snapshot: &Path) -> Result<Self> {
        let path = sibling(snapshot, ".lock");

        for _ in 0..LOCK_ATTEMPTS {
            match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let _ = writeln!(file, "{}", std::process::id());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => thread::sleep(LOCK_RETRY),
                Err(e) => {
                    return Err(SearchError::CacheError(format!(
                        "Failed to lock {}: {}",
                        snapshot.display(),
                        e
                    )));
                }
            }
        }

        Err(SearchError::CacheError(format!(
            "Snapshot {} is locked by another process",
            snapshot.display()
        )))
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Replace `path` with `contents` in one rename.
fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let temp = sibling(path, &format!(".tmp.{}", std::process::id()));

    fs::write(&temp, contents).map_err(|e| {
        SearchError::CacheError(format!("Failed to write {}: {}", temp.display(), e))
    })?;
    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        SearchError::CacheError(format!("Failed to replace {}: {}", path.display(), e))
    })
}
