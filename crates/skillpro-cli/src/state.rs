//! Application state wiring the engine together.
//!
//! Pins the generic resolver to the filesystem loader and the cache backend
//! selected by the configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use skillpro_core::skill::resolver::SkillResolver;
use skillpro_infra::cache::open_cache;
use skillpro_infra::config::{default_cache_dir, default_config_path, load_config};
use skillpro_infra::skill::fs_loader::FsSkillLoader;
use skillpro_types::config::EngineConfig;
use skillpro_types::resolve::ResolverOptions;

use crate::cli::ResolveFlags;

pub type ConcreteResolver = SkillResolver<FsSkillLoader>;

/// Shared state for all commands.
pub struct AppState {
    pub config: EngineConfig,
    pub resolver: Arc<ConcreteResolver>,
}

impl AppState {
    /// Load configuration and build the resolver.
    ///
    /// An explicitly given config file must exist; the default location may
    /// be absent. The CLI keeps its cache on disk unless the config names a
    /// different directory.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                    bail!("Config file not found: {}", path.display());
                }
                load_config(path).await
            }
            None => match default_config_path() {
                Some(path) => load_config(&path).await,
                None => EngineConfig::default(),
            },
        };
        if config.cache_dir.is_none() {
            config.cache_dir = default_cache_dir();
        }

        Ok(Self::with_config(config))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let cache = open_cache(&config);
        let resolver = Arc::new(SkillResolver::new(FsSkillLoader::new(), cache));
        Self { config, resolver }
    }

    /// Base path from the command line, falling back to the config file.
    pub fn base_path(&self, base: Option<&Path>) -> PathBuf {
        base.map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.base_path.clone())
    }

    /// Resolver options for this invocation.
    pub fn resolver_options(&self, flags: &ResolveFlags) -> ResolverOptions {
        let mut options = self.config.resolver_options();
        options.base_path = self.base_path(flags.base.as_deref());
        options.resolve_includes &= !flags.no_includes;
        options.resolve_context &= !flags.no_context;
        options.resolve_templates &= !flags.no_templates;
        options.resolve_skills &= !flags.no_skills;
        options.check_structure &= !flags.no_structure;
        options.cache &= !flags.no_cache;
        options
    }
}
