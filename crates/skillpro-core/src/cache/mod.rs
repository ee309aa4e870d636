//! Resolution cache port and in-process implementations.
//!
//! A cache maps exact skill identifiers to previously parsed skills. Expiry
//! is evaluated lazily on lookup; there is no background sweeper.

pub mod clock;
pub mod memory;

use std::sync::Arc;

use skillpro_types::skill::ParsedSkill;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryCache;

/// Store of parsed skills shared between resolutions.
///
/// Implementations must tolerate concurrent `get`/`put` from independent
/// resolutions; on key collision the last write wins.
pub trait SkillCache: Send + Sync {
    /// Look up a skill. An expired entry is removed and reported as a miss.
    fn get(&self, skill_id: &str) -> Option<ParsedSkill>;

    /// Store a skill for `ttl` seconds, replacing any previous entry.
    fn put(&self, skill_id: &str, skill: ParsedSkill, ttl: u64);

    /// Drop the entry for `skill_id`, if any.
    fn invalidate(&self, skill_id: &str);
}

impl<C: SkillCache + ?Sized> SkillCache for Arc<C> {
    fn get(&self, skill_id: &str) -> Option<ParsedSkill> {
        (**self).get(skill_id)
    }

    fn put(&self, skill_id: &str, skill: ParsedSkill, ttl: u64) {
        (**self).put(skill_id, skill, ttl)
    }

    fn invalidate(&self, skill_id: &str) {
        (**self).invalidate(skill_id)
    }
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl SkillCache for NoopCache {
    fn get(&self, _skill_id: &str) -> Option<ParsedSkill> {
        None
    }

    fn put(&self, _skill_id: &str, _skill: ParsedSkill, _ttl: u64) {}

    fn invalidate(&self, _skill_id: &str) {}
}
