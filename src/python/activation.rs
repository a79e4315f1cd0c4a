//! Virtual environment activation.
//!
//! A child process cannot change its parent shell's environment, so
//! activation is not delegated to the `activate` scripts. Instead an
//! [`Activation`] holds the same variables those scripts set and applies them
//! to every command run while it is alive. Deactivating consumes it.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Result, VenvkeepError};
use crate::shell::CommandOptions;

use super::venv::VirtualEnv;

/// Variables the activation scripts unset.
const REMOVED_VARS: &[&str] = &["PYTHONHOME"];

/// An activated virtual environment.
#[derive(Debug, Clone)]
pub struct Activation {
    venv: VirtualEnv,
    env: HashMap<String, String>,
}

impl Activation {
    /// Activate `venv` on top of the current process PATH.
    ///
    /// Fails when the environment has no interpreter.
    pub fn activate(venv: &VirtualEnv) -> Result<Self> {
        if !venv.is_usable() {
            return Err(VenvkeepError::ActivationFailed {
                path: venv.root().to_path_buf(),
                message: format!("{} does not exist", venv.python().display()),
            });
        }
        Self::with_base_path(venv, std::env::var_os("PATH"))
    }

    /// Build the overlay for `venv` without checking that it exists.
    ///
    /// Used by dry runs, where the environment was never created.
    pub fn activate_unchecked(venv: &VirtualEnv) -> Result<Self> {
        Self::with_base_path(venv, std::env::var_os("PATH"))
    }

    /// Build the overlay on top of an explicit base PATH.
    pub fn with_base_path(venv: &VirtualEnv, base_path: Option<OsString>) -> Result<Self> {
        let root = absolute(venv.root());
        let scripts = root.join(super::venv::scripts_dir_name());

        let mut entries = vec![scripts];
        if let Some(base) = &base_path {
            entries.extend(std::env::split_paths(base));
        }
        let path = std::env::join_paths(entries).map_err(|e| VenvkeepError::ActivationFailed {
            path: root.clone(),
            message: format!("cannot build PATH: {}", e),
        })?;

        let mut env = HashMap::new();
        env.insert("VIRTUAL_ENV".to_string(), root.to_string_lossy().to_string());
        env.insert("PATH".to_string(), path.to_string_lossy().to_string());
        env.insert(
            "VIRTUAL_ENV_PROMPT".to_string(),
            format!("({})", venv.prompt_name()),
        );

        tracing::debug!("Activated {}", root.display());

        Ok(Self {
            venv: VirtualEnv::new(root),
            env,
        })
    }

    /// The activated environment.
    pub fn venv(&self) -> &VirtualEnv {
        &self.venv
    }

    /// Variables set while active.
    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Command options for running inside the environment.
    ///
    /// `extra` variables are applied first so the activation always wins for
    /// `PATH` and `VIRTUAL_ENV`.
    pub fn command_options(&self, extra: &HashMap<String, String>, cwd: &Path) -> CommandOptions {
        let mut env = extra.clone();
        env.extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));
        CommandOptions {
            cwd: Some(cwd.to_path_buf()),
            env,
            env_remove: REMOVED_VARS.iter().map(|s| s.to_string()).collect(),
            capture_stdout: true,
            capture_stderr: true,
        }
    }

    /// Leave the environment.
    ///
    /// Returns the environment root for reporting.
    pub fn deactivate(self) -> PathBuf {
        tracing::debug!("Deactivated {}", self.venv.root().display());
        self.venv.root().to_path_buf()
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
