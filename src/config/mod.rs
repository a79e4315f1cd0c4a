//! Configuration loading, parsing, and validation for venvkeep.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use venvkeep::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".venvkeep.yml"), "settings:\n  venv_dir: .venv\n").unwrap();
//!
//! let config = load_config(temp.path(), Some(&temp.path().join(".venvkeep.yml"))).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.settings.venv_dir, std::path::PathBuf::from(".venv"));
//! ```
//!
//! # Configuration File Locations
//!
//! venvkeep discovers and merges configuration in this order:
//! 1. User global config (`<config dir>/venvkeep/config.yml`)
//! 2. Project config (`.venvkeep.yml`)
//! 3. Local overrides (`.venvkeep.local.yml`)
//!
//! Command-line flags are applied on top by the CLI.

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    load_config, load_config_value, load_merged_config, parse_config, ConfigPaths, LOCAL_CONFIG,
    PROJECT_CONFIG,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{OutputMode, PauseMode, Settings, VenvkeepConfig};
pub use validator::{validate, validate_config, ValidationError};
