//! pip command construction and output parsing.
//!
//! pip is always run as `<venv python> -m pip`, never through a `pip`
//! launcher, so the environment being maintained is unambiguous and pip can
//! upgrade itself on Windows.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VenvkeepError};
use crate::shell::ProcessSpec;

fn pip(python: &Path) -> ProcessSpec {
    ProcessSpec::new(python).args(["-m", "pip"])
}

/// `python -m pip install --upgrade pip`.
pub fn upgrade_pip(python: &Path, extra_args: &[String]) -> ProcessSpec {
    pip(python)
        .args(["install", "--upgrade", "pip"])
        .args(extra_args.iter().cloned())
}

/// `python -m pip install --upgrade -r <manifest>`.
pub fn install_requirements(python: &Path, manifest: &Path, extra_args: &[String]) -> ProcessSpec {
    pip(python)
        .args(["install", "--upgrade", "-r"])
        .arg(manifest.to_string_lossy())
        .args(extra_args.iter().cloned())
}

/// `python -m pip list --format=json`.
pub fn list_packages(python: &Path) -> ProcessSpec {
    pip(python).args(["list", "--format=json", "--disable-pip-version-check"])
}

/// One entry of `pip list --format=json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable_project_location: Option<String>,
}

/// Parse `pip list --format=json` output.
///
/// pip may print warnings before the JSON array; everything before the first
/// line starting with `[` is ignored.
pub fn parse_package_list(output: &str) -> Result<Vec<InstalledPackage>> {
    let trimmed = output.trim_start();
    let json = if trimmed.starts_with('[') {
        trimmed
    } else {
        output
            .find("\n[")
            .map(|i| &output[i + 1..])
            .ok_or_else(|| {
                VenvkeepError::Other(anyhow::anyhow!("pip list did not produce a JSON array"))
            })?
    };

    let mut packages: Vec<InstalledPackage> = serde_json::from_str(json.trim())
        .map_err(|e| VenvkeepError::Other(anyhow::anyhow!("invalid pip list output: {}", e)))?;
    packages.sort_by_key(|p| p.name.to_lowercase());
    Ok(packages)
}
