//! Cache backends provided by the infrastructure layer.

pub mod disk;

use std::sync::Arc;

use skillpro_core::cache::{MemoryCache, NoopCache, SkillCache};
use skillpro_types::config::EngineConfig;

pub use disk::DiskCache;

/// Pick the cache backend described by `config`.
///
/// Caching disabled yields a [`NoopCache`]; a configured `cache_dir` yields a
/// [`DiskCache`]; otherwise an in-process [`MemoryCache`].
pub fn open_cache(config: &EngineConfig) -> Arc<dyn SkillCache> {
    if !config.cache {
        return Arc::new(NoopCache);
    }
    match &config.cache_dir {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "Using disk cache");
            Arc::new(DiskCache::new(dir.clone()))
        }
        None => Arc::new(MemoryCache::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillpro_core::skill::loader::assemble_skill;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn skill() -> skillpro_types::skill::ParsedSkill {
        assemble_skill(
            "a",
            PathBuf::from("a.md"),
            "---\nname: a\ndescription: d\n---\n",
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let config = EngineConfig {
            cache: false,
            ..EngineConfig::default()
        };
        let cache = open_cache(&config);
        cache.put("a", skill(), 60);
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_cache_dir_selects_disk_backend() {
        let tmp = TempDir::new().unwrap();
        let config = EngineConfig {
            cache_dir: Some(tmp.path().to_path_buf()),
            ..EngineConfig::default()
        };
        open_cache(&config).put("a", skill(), 60);

        // A second handle on the same directory sees the entry.
        assert!(open_cache(&config).get("a").is_some());
        assert!(DiskCache::new(tmp.path()).entry_path("a").is_file());
    }

    #[test]
    fn test_default_is_in_memory() {
        let cache = open_cache(&EngineConfig::default());
        cache.put("a", skill(), 60);
        assert!(cache.get("a").is_some());
        assert!(open_cache(&EngineConfig::default()).get("a").is_none());
    }
}
