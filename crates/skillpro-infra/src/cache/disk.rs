//! On-disk resolution cache.
//!
//! Each entry is a JSON-serialized `CacheEntry` stored at
//! `{dir}/{sha256(skill_id)}.json`. Writes go to a temporary file in the same
//! directory and are renamed into place, so readers never observe a partial
//! entry and concurrent writers resolve to last-write-wins.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use sha2::{Digest, Sha256};
use skillpro_core::cache::{Clock, SkillCache, SystemClock};
use skillpro_types::skill::{CacheEntry, ParsedSkill};

const ENTRY_EXTENSION: &str = "json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistent skill cache rooted at a directory.
///
/// The trait methods cannot fail: I/O problems are logged and treated as a
/// miss (on read) or a skipped write.
#[derive(Clone)]
pub struct DiskCache {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl DiskCache {
    /// Create a cache in `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry file for `skill_id`.
    pub fn entry_path(&self, skill_id: &str) -> PathBuf {
        let digest = Sha256::digest(skill_id.as_bytes());
        self.dir.join(format!("{:x}.{ENTRY_EXTENSION}", digest))
    }

    /// Delete every entry file. Returns the number of entries removed.
    pub fn clear(&self) -> anyhow::Result<usize> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read cache directory: {}", self.dir.display())
                });
            }
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                removed += 1;
            }
        }
        tracing::debug!(dir = %self.dir.display(), removed, "Cleared disk cache");
        Ok(removed)
    }

    fn read_entry(&self, path: &Path) -> anyhow::Result<Option<CacheEntry>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };
        let entry = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(entry))
    }

    fn write_entry(&self, path: &Path, entry: &CacheEntry) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory: {}", self.dir.display()))?;

        let json = serde_json::to_vec(entry).context("Failed to serialize cache entry")?;
        let tmp = path.with_extension(format!(
            "{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e).with_context(|| {
                format!("Failed to move cache entry into place: {}", path.display())
            });
        }
        Ok(())
    }

    fn remove_entry(path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove cache entry");
            }
        }
    }
}

impl std::fmt::Debug for DiskCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskCache").field("dir", &self.dir).finish()
    }
}

impl SkillCache for DiskCache {
    fn get(&self, skill_id: &str) -> Option<ParsedSkill> {
        let path = self.entry_path(skill_id);
        let entry = match self.read_entry(&path) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(skill = %skill_id, error = %e, "Discarding unreadable cache entry");
                Self::remove_entry(&path);
                return None;
            }
        };

        if entry.is_expired(self.clock.now()) {
            tracing::debug!(skill = %skill_id, "Evicted expired cache entry");
            Self::remove_entry(&path);
            return None;
        }
        if entry.skill.id != skill_id {
            return None;
        }
        Some(entry.skill)
    }

    fn put(&self, skill_id: &str, skill: ParsedSkill, ttl: u64) {
        let path = self.entry_path(skill_id);
        let entry = CacheEntry::new(skill, self.clock.now(), ttl);
        if let Err(e) = self.write_entry(&path, &entry) {
            tracing::warn!(skill = %skill_id, error = %e, "Failed to write cache entry");
        }
    }

    fn invalidate(&self, skill_id: &str) {
        Self::remove_entry(&self.entry_path(skill_id));
    }
}
