//! `skillpro cache`: manage the on-disk resolution cache.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use skillpro_infra::cache::DiskCache;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Remove every cached skill.
    Clear,

    /// Print the cache directory.
    Dir,
}

pub fn handle_cache_command(
    action: CacheCommand,
    state: &AppState,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let Some(dir) = state.config.cache_dir.as_deref() else {
        if json {
            println!("{}", serde_json::json!({ "cache_dir": null, "removed": 0 }));
        } else if !quiet {
            println!("  No disk cache configured.");
        }
        return Ok(());
    };

    match action {
        CacheCommand::Clear => {
            let removed = DiskCache::new(dir).clear()?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "cache_dir": dir, "removed": removed })
                );
            } else if !quiet {
                println!(
                    "  {} Removed {removed} cached skill(s) from {}",
                    style("✓").green(),
                    style(dir.display()).dim()
                );
            }
        }
        CacheCommand::Dir => {
            if json {
                println!("{}", serde_json::json!({ "cache_dir": dir }));
            } else {
                println!("{}", dir.display());
            }
        }
    }
    Ok(())
}
