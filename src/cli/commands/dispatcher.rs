//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the global flags every command shares
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{load_config, validate, Settings};
use crate::error::Result;
use crate::locale::Locale;
use crate::ui::UserInterface;

/// Exit code for invalid or unreadable configuration.
pub const CONFIG_ERROR_EXIT: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub project_root: PathBuf,
    /// `--config`: load only this file.
    pub config_path: Option<PathBuf>,
    /// `--lang`.
    pub lang: Option<Locale>,
    /// Whether `-v`/`-q` was given; otherwise `settings.default_output` applies.
    pub output_explicit: bool,
}

impl CommandContext {
    /// Context for `project_root` with no global overrides.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    /// Load and validate configuration.
    pub fn load_settings(&self) -> Result<Settings> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        validate(&config)?;
        Ok(config.settings)
    }

    /// Message language for these settings.
    pub fn locale(&self, settings: &Settings) -> Locale {
        Locale::resolve(self.lang, settings.language)
    }

    /// Apply the configured output mode unless one was given on the command line.
    pub fn apply_output_mode(&self, ui: &mut dyn UserInterface, settings: &Settings) {
        if !self.output_explicit {
            ui.set_output_mode(settings.default_output.into());
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given context.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.context.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Configuration errors are reported here and mapped to exit code 2.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let result = match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(self.context.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Status(args)) => {
                super::status::StatusCommand::new(self.context.clone(), args.clone()).execute(ui)
            }
            Some(Commands::List(args)) => {
                super::list::ListCommand::new(self.context.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::run::RunCommand::new(self.context.clone(), RunArgs::default())
                .execute(ui),
        };

        match result {
            Err(e) if e.is_config_error() => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(CONFIG_ERROR_EXIT))
            }
            other => other,
        }
    }
}
