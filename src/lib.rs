//! venvkeep - Routine maintenance for a Python virtual environment.
//!
//! One command checks for a Python interpreter, creates the project's
//! virtual environment if it is missing, upgrades pip, installs or upgrades
//! everything in `requirements.txt`, lists the installed packages and leaves
//! the environment again. Each step is a call to an external tool; a failing
//! step stops the ones after it.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`error`] - Error types and result aliases
//! - [`locale`] - Localized console messages
//! - [`maintenance`] - The step pipeline and failure diagnosis
//! - [`python`] - Interpreters, virtual environments, pip, and manifests
//! - [`shell`] - External command execution
//! - [`ui`] - Spinners, prompts, tables, and terminal output
//!
//! # Example
//!
//! ```
//! use venvkeep::maintenance::MaintenanceStep;
//! use venvkeep::locale::Locale;
//!
//! let titles: Vec<String> = MaintenanceStep::ALL
//!     .iter()
//!     .map(|step| step.title(Locale::English))
//!     .collect();
//! assert_eq!(titles[0], "Check Python interpreter");
//! assert_eq!(titles.last().unwrap(), "Deactivate virtual environment");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod locale;
pub mod maintenance;
pub mod python;
pub mod shell;
pub mod ui;

pub use error::{Result, VenvkeepError};
