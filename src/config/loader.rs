//! Configuration file discovery and loading.
//!
//! Configuration is optional: when no file exists the defaults apply.

use crate::config::merger::merge_configs;
use crate::config::schema::VenvkeepConfig;
use crate::error::{Result, VenvkeepError};
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file name.
pub const PROJECT_CONFIG: &str = ".venvkeep.yml";

/// Local, usually git-ignored, override file name.
pub const LOCAL_CONFIG: &str = ".venvkeep.local.yml";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global config (`<config dir>/venvkeep/config.yml`)
/// 2. Project config (`.venvkeep.yml`)
/// 3. Local overrides (`.venvkeep.local.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config
    pub user_global: Option<PathBuf>,

    /// Project config
    pub project: Option<PathBuf>,

    /// Local overrides
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let user_dir = dirs::config_dir().map(|d| d.join("venvkeep"));
        Self::discover_in(project_root, user_dir.as_deref())
    }

    /// Discover config files with an explicit user config directory.
    pub fn discover_in(project_root: &Path, user_config_dir: Option<&Path>) -> Self {
        Self {
            user_global: user_config_dir.and_then(|d| existing(d.join("config.yml"))),
            project: existing(project_root.join(PROJECT_CONFIG)),
            project_local: existing(project_root.join(LOCAL_CONFIG)),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Whether any config file was found.
    pub fn is_empty(&self) -> bool {
        self.all_existing().is_empty()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load a config file as a raw YAML value, for merging.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VenvkeepError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            VenvkeepError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| VenvkeepError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML content into a config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<VenvkeepConfig> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| VenvkeepError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    from_value(merge_configs(&[value]), source_path)
}

/// Load and merge the discovered config files.
pub fn load_merged_config(paths: &ConfigPaths, project_root: &Path) -> Result<VenvkeepConfig> {
    let mut configs = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading config from {}", path.display());
        configs.push(load_config_value(path)?);
    }

    let report_path = paths
        .project_local
        .clone()
        .or_else(|| paths.project.clone())
        .or_else(|| paths.user_global.clone())
        .unwrap_or_else(|| project_root.join(PROJECT_CONFIG));

    from_value(merge_configs(&configs), &report_path)
}

/// Load config with an optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
/// Otherwise, discovers and merges all config files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<VenvkeepConfig> {
    match config_override {
        Some(path) => {
            let value = load_config_value(path)?;
            from_value(merge_configs(&[value]), path)
        }
        None => load_merged_config(&ConfigPaths::discover(project_root), project_root),
    }
}

fn from_value(value: serde_yaml::Value, path: &Path) -> Result<VenvkeepConfig> {
    serde_yaml::from_value(value).map_err(|e| VenvkeepError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
