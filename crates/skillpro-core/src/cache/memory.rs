//! In-memory TTL cache backed by `DashMap`.
//!
//! Skills are cloned on read so no `DashMap` guard outlives a call.

use std::sync::Arc;

use dashmap::DashMap;
use skillpro_types::skill::{CacheEntry, ParsedSkill};

use super::SkillCache;
use super::clock::{Clock, SystemClock};

/// Concurrent in-process skill cache with lazy expiry.
///
/// Cloning produces a shared view of the same entries (backed by `Arc`).
#[derive(Clone)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Create an empty cache using wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Snapshot of the stored entry for `skill_id`, expired or not.
    pub fn entry(&self, skill_id: &str) -> Option<CacheEntry> {
        self.entries.get(skill_id).map(|r| r.value().clone())
    }

    /// Number of stored entries, including ones not yet observed as expired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl SkillCache for MemoryCache {
    fn get(&self, skill_id: &str) -> Option<ParsedSkill> {
        let now = self.clock.now();
        {
            let entry = self.entries.get(skill_id)?;
            if !entry.is_expired(now) {
                return Some(entry.skill.clone());
            }
        }

        // A concurrent put may have refreshed the entry since the read.
        self.entries
            .remove_if(skill_id, |_, entry| entry.is_expired(now));
        tracing::debug!(skill = %skill_id, "Evicted expired cache entry");
        None
    }

    fn put(&self, skill_id: &str, skill: ParsedSkill, ttl: u64) {
        let entry = CacheEntry::new(skill, self.clock.now(), ttl);
        self.entries.insert(skill_id.to_owned(), entry);
    }

    fn invalidate(&self, skill_id: &str) {
        if self.entries.remove(skill_id).is_some() {
            tracing::debug!(skill = %skill_id, "Invalidated cache entry");
        }
    }
}
