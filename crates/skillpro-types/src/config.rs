//! Engine configuration types.
//!
//! `EngineConfig` represents the `config.toml` that sets the default skill
//! base path, cache behaviour and which reference edges are followed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::resolve::{DEFAULT_CACHE_TTL_SECS, ResolverOptions};

/// Top-level configuration for the resolution engine.
///
/// All fields have sensible defaults; an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory skills are looked up in.
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,

    /// TTL in seconds for cached skills.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Directory for the on-disk cache. `None` keeps the cache in memory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub resolve_includes: bool,

    #[serde(default = "default_true")]
    pub resolve_context: bool,

    #[serde(default = "default_true")]
    pub resolve_templates: bool,

    #[serde(default = "default_true")]
    pub resolve_skills: bool,

    /// Check declared script and type entries for existence.
    #[serde(default = "default_true")]
    pub check_structure: bool,

    #[serde(default = "default_true")]
    pub cache: bool,
}

fn default_base_path() -> PathBuf {
    PathBuf::from("skills")
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_dir: None,
            resolve_includes: true,
            resolve_context: true,
            resolve_templates: true,
            resolve_skills: true,
            check_structure: true,
            cache: true,
        }
    }
}

impl EngineConfig {
    /// Resolver options derived from this configuration.
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            base_path: self.base_path.clone(),
            resolve_includes: self.resolve_includes,
            resolve_context: self.resolve_context,
            resolve_templates: self.resolve_templates,
            resolve_skills: self.resolve_skills,
            check_structure: self.check_structure,
            cache: self.cache,
            cache_ttl_secs: self.cache_ttl_secs,
        }
    }
}
