//! skillpro CLI entry point.
//!
//! Binary name: `skillpro`
//!
//! Parses CLI arguments, sets up tracing and configuration, then dispatches
//! to the command handlers. Exits with status 1 when a resolution or
//! validation fails.

mod cli;
mod state;

use std::path::Path;

use clap::Parser;
use clap_complete::generate;
use skillpro_observe::tracing_setup::{
    TracingOptions, init_tracing, shutdown_tracing, verbosity_filter,
};

use cli::{Cli, Commands, ResolveFlags};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let tracing_options = TracingOptions {
        enable_otel: cli.otel,
        ..TracingOptions::new(verbosity_filter(cli.verbose, cli.quiet))
    };
    if let Err(e) = init_tracing(&tracing_options) {
        eprintln!("Warning: failed to initialise tracing: {e}");
    }

    let outcome = run(cli).await;
    shutdown_tracing();

    if !outcome? {
        std::process::exit(1);
    }
    Ok(())
}

/// Dispatch a parsed command. Returns `false` when the command ran but the
/// skills it checked are invalid.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let Cli {
        command,
        json,
        quiet,
        config,
        ..
    } = cli;

    match command {
        // Shell completions and scanning don't need configuration
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "skillpro", &mut std::io::stdout());
            Ok(true)
        }

        Commands::Scan { file } => {
            cli::scan::print_references(&file, json, quiet).await?;
            Ok(true)
        }

        Commands::Resolve { roots, flags } => {
            let state = load_state(config.as_deref()).await?;
            let options = state.resolver_options(&flags);
            cli::resolve::resolve_roots(&state, roots, &options, json, quiet).await
        }

        Commands::Validate { id, base, strict } => {
            let state = load_state(config.as_deref()).await?;
            cli::validate::validate_skill(&state, &id, base.as_deref(), strict, json, quiet)
        }

        Commands::Graph { root, base } => {
            let state = load_state(config.as_deref()).await?;
            let options = state.resolver_options(&ResolveFlags {
                base,
                ..ResolveFlags::default()
            });
            cli::graph::print_graph(&state, root, options, json).await?;
            Ok(true)
        }

        Commands::Cache { action } => {
            let state = load_state(config.as_deref()).await?;
            cli::cache::handle_cache_command(action, &state, json, quiet)?;
            Ok(true)
        }
    }
}

async fn load_state(config: Option<&Path>) -> anyhow::Result<AppState> {
    let state = AppState::init(config).await?;
    tracing::debug!(
        base = %state.config.base_path.display(),
        cache_dir = ?state.config.cache_dir,
        "Loaded configuration"
    );
    Ok(state)
}
