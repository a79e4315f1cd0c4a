//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations and shares the global flags through
//! [`CommandContext`].

pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod run;
pub mod status;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult, CONFIG_ERROR_EXIT};
