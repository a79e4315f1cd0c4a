//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//! - Spinners, tables, and the end-of-run summary
//!
//! # Example
//!
//! ```
//! use venvkeep::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Python virtual environment maintenance");
//! ui.success("Maintenance complete");
//! ```

pub mod hints;
pub mod icons;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use icons::StatusKind;
pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use spinner::{live_output_callback, passthrough_callback, ProgressSpinner};
pub use table::Table;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Theme};

use std::time::Duration;

use indicatif::ProgressBar;

use crate::error::Result;

/// Trait for user interface interactions.
///
/// The pipeline only talks to this trait, so tests can substitute [`MockUI`].
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Always shown.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Announce a step, e.g. `[2/7] ◆ Prepare virtual environment`.
    fn show_step(&mut self, index: usize, total: usize, title: &str);

    /// Show a contextual hint.
    fn show_hint(&mut self, hint: &str);

    /// Show preformatted detail, such as a package table.
    fn show_block(&mut self, text: &str);

    /// Show a failed command with its output and an optional hint.
    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>);

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Wait for Enter before exiting.
    fn pause(&mut self, message: &str) -> Result<()>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);

    /// The underlying bar, for streaming output into it.
    fn progress_bar(&self) -> Option<ProgressBar> {
        None
    }
}

/// A yes/no question.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Stable key, used for `VENVKEEP_PROMPT_<KEY>` overrides.
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer when the user just presses Enter.
    pub default: bool,
}

/// One row of the run summary.
#[derive(Debug, Clone)]
pub struct StepSummary {
    /// Step title.
    pub name: String,
    pub status: StatusKind,
    /// Wall time, for steps that ran.
    pub duration: Option<Duration>,
    /// Short detail shown when there is no duration.
    pub detail: Option<String>,
}

/// End-of-run summary.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Localized outcome line ("Maintenance complete").
    pub headline: String,
    pub step_results: Vec<StepSummary>,
    pub total_duration: Duration,
    pub steps_run: usize,
    pub steps_skipped: usize,
    pub success: bool,
    /// Titles of failed steps.
    pub failed_steps: Vec<String>,
}

/// Format a duration for display: `850ms`, `4.2s`, `2m 05s`.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// Parse a `VENVKEEP_PROMPT_*` style answer.
pub(crate) fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
