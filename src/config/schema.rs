//! Configuration schema definitions.
//!
//! Every field has a default, so an empty or missing config file yields a
//! working configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::locale::Locale;
use crate::python::default_candidates;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VenvkeepConfig {
    /// Global settings
    pub settings: Settings,
}

/// Settings controlling a maintenance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Virtual environment directory, relative to the project root
    pub venv_dir: PathBuf,

    /// Requirements manifest, relative to the project root
    pub requirements: PathBuf,

    /// Explicit interpreter; skips candidate search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<PathBuf>,

    /// Interpreter names searched on PATH, in order
    pub candidates: Vec<String>,

    /// Minimum acceptable Python version ("3.8", "3.11.2")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_python: Option<String>,

    /// Run `pip install --upgrade pip`
    pub upgrade_pip: bool,

    /// Show installed packages at the end
    pub list_packages: bool,

    /// Extra arguments appended to every `pip install`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pip_args: Vec<String>,

    /// Extra environment for every command
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// When to wait for Enter before exiting
    pub pause: PauseMode,

    /// Message language; detected from the system locale when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Locale>,

    /// Output verbosity when no flag is given
    pub default_output: OutputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            venv_dir: PathBuf::from("venv"),
            requirements: PathBuf::from("requirements.txt"),
            python: None,
            candidates: default_candidates(),
            min_python: None,
            upgrade_pip: true,
            list_packages: true,
            pip_args: Vec::new(),
            env: HashMap::new(),
            pause: PauseMode::default(),
            language: None,
            default_output: OutputMode::default(),
        }
    }
}

/// Output verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}

/// End-of-run pause policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseMode {
    /// Pause when interactive and not in CI.
    #[default]
    Auto,
    /// Pause whenever stdin is a terminal, even in CI.
    Always,
    /// Never pause.
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_uses_defaults() {
        let config: VenvkeepConfig = serde_yaml::from_str("{}").unwrap();
        let s = &config.settings;

        assert_eq!(s.venv_dir, PathBuf::from("venv"));
        assert_eq!(s.requirements, PathBuf::from("requirements.txt"));
        assert!(s.upgrade_pip);
        assert!(s.list_packages);
        assert_eq!(s.candidates, default_candidates());
        assert_eq!(s.pause, PauseMode::Auto);
        assert_eq!(s.default_output, OutputMode::Normal);
        assert!(s.language.is_none());
    }

    #[test]
    fn parses_full_settings() {
        let yaml = r#"
settings:
  venv_dir: .venv
  requirements: requirements/prod.txt
  python: /opt/python3.12/bin/python3
  candidates: [python3.12, python3]
  min_python: "3.10"
  upgrade_pip: false
  list_packages: false
  pip_args: ["--index-url", "https://mirror.test/simple"]
  env:
    PIP_DISABLE_PIP_VERSION_CHECK: "1"
  pause: never
  language: ja
  default_output: quiet
"#;
        let config: VenvkeepConfig = serde_yaml::from_str(yaml).unwrap();
        let s = config.settings;

        assert_eq!(s.venv_dir, PathBuf::from(".venv"));
        assert_eq!(s.requirements, PathBuf::from("requirements/prod.txt"));
        assert_eq!(s.python, Some(PathBuf::from("/opt/python3.12/bin/python3")));
        assert_eq!(s.candidates, vec!["python3.12", "python3"]);
        assert_eq!(s.min_python.as_deref(), Some("3.10"));
        assert!(!s.upgrade_pip);
        assert!(!s.list_packages);
        assert_eq!(s.pip_args.len(), 2);
        assert_eq!(s.env["PIP_DISABLE_PIP_VERSION_CHECK"], "1");
        assert_eq!(s.pause, PauseMode::Never);
        assert_eq!(s.language, Some(Locale::Japanese));
        assert_eq!(s.default_output, OutputMode::Quiet);
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let config: VenvkeepConfig = serde_yaml::from_str("settings:\n  venv_dir: env\n").unwrap();
        assert_eq!(config.settings.venv_dir, PathBuf::from("env"));
        assert!(config.settings.upgrade_pip);
    }

    #[test]
    fn rejects_unknown_pause_mode() {
        let result: std::result::Result<VenvkeepConfig, _> =
            serde_yaml::from_str("settings:\n  pause: sometimes\n");
        assert!(result.is_err());
    }
}
