//! CLI command definitions for the `skillpro` binary.
//!
//! Uses clap derive macros for argument parsing. Every command honours the
//! global `--json` flag for machine-readable output.

pub mod cache;
pub mod graph;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Resolve, validate and inspect skill documents.
#[derive(Parser)]
#[command(name = "skillpro", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, global = true, env = "SKILLPRO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, hide = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve one or more root skills and report the dependency closure.
    Resolve {
        /// Root skill identifiers, resolved concurrently.
        #[arg(required = true)]
        roots: Vec<String>,

        #[command(flatten)]
        flags: ResolveFlags,
    },

    /// Validate a single skill without following its dependencies.
    Validate {
        /// Skill identifier.
        id: String,

        /// Skill base directory (overrides the config file).
        #[arg(long, env = "SKILLPRO_BASE")]
        base: Option<PathBuf>,

        /// Treat warnings as failures.
        #[arg(long)]
        strict: bool,
    },

    /// List the reference markers found in a document.
    Scan {
        /// Path to a skill document.
        file: PathBuf,
    },

    /// Print the resolved dependency graph in Graphviz DOT format.
    Graph {
        /// Root skill identifier.
        root: String,

        /// Skill base directory (overrides the config file).
        #[arg(long, env = "SKILLPRO_BASE")]
        base: Option<PathBuf>,
    },

    /// Manage the on-disk resolution cache.
    Cache {
        #[command(subcommand)]
        action: cache::CacheCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Options shared by commands that run a resolution.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ResolveFlags {
    /// Skill base directory (overrides the config file).
    #[arg(long, env = "SKILLPRO_BASE")]
    pub base: Option<PathBuf>,

    /// Do not check include targets.
    #[arg(long)]
    pub no_includes: bool,

    /// Do not check context files.
    #[arg(long)]
    pub no_context: bool,

    /// Do not check template references.
    #[arg(long)]
    pub no_templates: bool,

    /// Do not check declared script and types entries.
    #[arg(long)]
    pub no_structure: bool,

    /// Do not follow skill dependencies.
    #[arg(long)]
    pub no_skills: bool,

    /// Bypass the resolution cache entirely.
    #[arg(long)]
    pub no_cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_accepts_many_roots_and_flags() {
        let cli = Cli::try_parse_from([
            "skillpro",
            "resolve",
            "api-design",
            "auth",
            "--base",
            "/srv/skills",
            "--no-context",
            "--no-templates",
            "--no-cache",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::Resolve { roots, flags } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(roots, vec!["api-design", "auth"]);
        assert_eq!(flags.base, Some(PathBuf::from("/srv/skills")));
        assert!(flags.no_context);
        assert!(flags.no_templates);
        assert!(!flags.no_structure);
        assert!(flags.no_cache);
        assert!(!flags.no_includes);
    }

    #[test]
    fn test_resolve_requires_a_root() {
        assert!(Cli::try_parse_from(["skillpro", "resolve"]).is_err());
    }

    #[test]
    fn test_verbosity_is_counted() {
        let cli = Cli::try_parse_from(["skillpro", "-vv", "scan", "SKILL.md"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
