//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::locale::Locale;

/// venvkeep - Routine maintenance for a Python virtual environment.
#[derive(Debug, Parser)]
#[command(name = "venvkeep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (skips .venvkeep.yml discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output, including pip's own output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Message language
    #[arg(long, global = true, value_enum, env = "VENVKEEP_LANG")]
    pub lang: Option<Locale>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Maintain the virtual environment (default if no command specified)
    Run(RunArgs),

    /// Show interpreter, environment and manifest state
    Status(StatusArgs),

    /// List packages installed in the environment
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Virtual environment directory
    #[arg(long, value_name = "DIR")]
    pub venv: Option<PathBuf>,

    /// Requirements manifest
    #[arg(short, long, value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Python interpreter to create the environment with
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Delete and recreate an existing environment
    #[arg(long)]
    pub recreate: bool,

    /// Do not upgrade pip
    #[arg(long)]
    pub skip_pip_upgrade: bool,

    /// Do not list installed packages
    #[arg(long)]
    pub no_list: bool,

    /// Preview commands without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Wait for Enter before exiting
    #[arg(long, conflicts_with = "no_pause")]
    pub pause: bool,

    /// Never wait for Enter before exiting
    #[arg(long)]
    pub no_pause: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_command_defaults_to_none() {
        let cli = Cli::try_parse_from(["venvkeep"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "venvkeep",
            "run",
            "--venv",
            ".venv",
            "-r",
            "dev-requirements.txt",
            "--recreate",
            "--no-list",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.venv, Some(PathBuf::from(".venv")));
                assert_eq!(args.requirements, Some(PathBuf::from("dev-requirements.txt")));
                assert!(args.recreate);
                assert!(args.no_list);
                assert!(args.dry_run);
                assert!(!args.skip_pip_upgrade);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn pause_flags_conflict() {
        let result = Cli::try_parse_from(["venvkeep", "run", "--pause", "--no-pause"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["venvkeep", "status", "--json", "--lang", "ja", "-q"]).unwrap();
        assert_eq!(cli.lang, Some(Locale::Japanese));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Status(StatusArgs { json: true }))));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["venvkeep", "-v", "-q"]).is_err());
    }
}
