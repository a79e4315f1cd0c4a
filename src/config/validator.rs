//! Configuration validation rules.
//!
//! All problems are collected before reporting so the user can fix them in
//! one pass.

use crate::config::schema::VenvkeepConfig;
use crate::error::{Result, VenvkeepError};
use crate::python::PythonVersion;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Setting the error refers to
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &VenvkeepConfig) -> Vec<ValidationError> {
    let settings = &config.settings;
    let mut errors = Vec::new();

    if settings.venv_dir.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "venv_dir".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if settings.requirements.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "requirements".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if settings.python.is_none() && settings.candidates.iter().all(|c| c.trim().is_empty()) {
        errors.push(ValidationError {
            field: "candidates".to_string(),
            message: "at least one interpreter name is required".to_string(),
        });
    }

    if let Some(min) = &settings.min_python {
        if let Err(e) = min.parse::<PythonVersion>() {
            errors.push(ValidationError {
                field: "min_python".to_string(),
                message: e,
            });
        }
    }

    errors
}

/// Validate and return an error describing every problem found.
pub fn validate(config: &VenvkeepConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| format!("settings.{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(VenvkeepError::ConfigValidationError { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&VenvkeepConfig::default()).is_ok());
    }

    #[test]
    fn empty_paths_are_rejected() {
        let mut config = VenvkeepConfig::default();
        config.settings.venv_dir = PathBuf::new();
        config.settings.requirements = PathBuf::new();

        let errors = validate_config(&config);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert_eq!(fields, vec!["venv_dir", "requirements"]);
    }

    #[test]
    fn empty_candidates_rejected_without_explicit_python() {
        let mut config = VenvkeepConfig::default();
        config.settings.candidates = Vec::new();
        assert_eq!(validate_config(&config).len(), 1);

        config.settings.python = Some(PathBuf::from("/usr/bin/python3"));
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn bad_min_python_is_rejected() {
        let mut config = VenvkeepConfig::default();
        config.settings.min_python = Some("three".to_string());

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, VenvkeepError::ConfigValidationError { .. }));
        assert!(err.to_string().contains("settings.min_python"));
    }

    #[test]
    fn good_min_python_is_accepted() {
        let mut config = VenvkeepConfig::default();
        config.settings.min_python = Some("3.10".to_string());
        assert!(validate(&config).is_ok());
    }
}
