//! Error types for venvkeep operations.
//!
//! This module defines [`VenvkeepError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `VenvkeepError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `VenvkeepError::Other`) for unexpected errors
//! - Step failures inside the maintenance pipeline are reported through the UI
//!   and summarized; these variants carry the detail for that report

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for venvkeep operations.
#[derive(Debug, Error)]
pub enum VenvkeepError {
    /// No usable Python interpreter was found.
    #[error("Python interpreter not found (tried: {tried})")]
    InterpreterNotFound { tried: String },

    /// An interpreter was found but is older than the configured minimum.
    #[error("Python {found} at {path} is older than the required {required}")]
    UnsupportedPython {
        path: PathBuf,
        found: String,
        required: String,
    },

    /// `python -m venv` did not produce a usable environment.
    #[error("Failed to create virtual environment at {path}: {message}")]
    VenvCreationFailed { path: PathBuf, message: String },

    /// The environment could not be activated.
    #[error("Failed to activate virtual environment at {path}: {message}")]
    ActivationFailed { path: PathBuf, message: String },

    /// An external command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Explicitly requested configuration file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VenvkeepError {
    /// Whether this error comes from configuration rather than from the run.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
        )
    }
}

/// Result type alias for venvkeep operations.
pub type Result<T> = std::result::Result<T, VenvkeepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpreter_not_found_lists_candidates() {
        let err = VenvkeepError::InterpreterNotFound {
            tried: "python, python3".into(),
        };
        assert!(err.to_string().contains("python, python3"));
    }

    #[test]
    fn unsupported_python_displays_versions() {
        let err = VenvkeepError::UnsupportedPython {
            path: PathBuf::from("/usr/bin/python3"),
            found: "3.6.9".into(),
            required: "3.8".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("3.6.9"));
        assert!(msg.contains("3.8"));
        assert!(msg.contains("/usr/bin/python3"));
    }

    #[test]
    fn venv_creation_failed_displays_path_and_message() {
        let err = VenvkeepError::VenvCreationFailed {
            path: PathBuf::from("venv"),
            message: "ensurepip is not available".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("venv"));
        assert!(msg.contains("ensurepip"));
    }

    #[test]
    fn activation_failed_displays_path() {
        let err = VenvkeepError::ActivationFailed {
            path: PathBuf::from("/work/venv"),
            message: "interpreter missing".into(),
        };
        assert!(err.to_string().contains("/work/venv"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = VenvkeepError::CommandFailed {
            command: "python -m pip install --upgrade pip".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("pip install"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn config_errors_are_classified() {
        let err = VenvkeepError::ConfigValidationError {
            message: "venv_dir must not be empty".into(),
        };
        assert!(err.is_config_error());

        let err = VenvkeepError::CommandFailed {
            command: "pip".into(),
            code: None,
        };
        assert!(!err.is_config_error());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: VenvkeepError = io_err.into();
        assert!(matches!(err, VenvkeepError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts() {
        let err: VenvkeepError = anyhow::anyhow!("unexpected").into();
        assert!(matches!(err, VenvkeepError::Other(_)));
        assert_eq!(err.to_string(), "unexpected");
    }
}
