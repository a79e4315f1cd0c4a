//! Virtual environment layout and creation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VenvkeepError};
use crate::shell::ProcessSpec;

use super::interpreter::Interpreter;

/// Name of the scripts directory inside an environment on this platform.
pub fn scripts_dir_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "Scripts"
    } else {
        "bin"
    }
}

/// File name of the environment's interpreter on this platform.
pub fn python_file_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "python.exe"
    } else {
        "python"
    }
}

/// Contents of an environment's `pyvenv.cfg`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyvenvCfg {
    /// Directory of the interpreter the environment was created from.
    pub home: Option<String>,
    /// Python version recorded at creation.
    pub version: Option<String>,
    /// Whether the base installation's site-packages are visible.
    pub include_system_site_packages: bool,
    /// Every other key, as written.
    pub extra: BTreeMap<String, String>,
}

impl PyvenvCfg {
    /// Parse `key = value` lines.
    ///
    /// Both `version` (written by `venv`) and `version_info` (written by
    /// some third-party creators) are accepted.
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim().to_string();
            match key.as_str() {
                "home" => cfg.home = Some(value),
                "version" => cfg.version = Some(value),
                "version_info" => {
                    if cfg.version.is_none() {
                        cfg.version = Some(trim_version_info(&value));
                    }
                }
                "include-system-site-packages" => {
                    cfg.include_system_site_packages = value.eq_ignore_ascii_case("true");
                }
                _ => {
                    cfg.extra.insert(key, value);
                }
            }
        }
        cfg
    }
}

/// `3.12.1.final.0` → `3.12.1`.
fn trim_version_info(value: &str) -> String {
    value
        .split('.')
        .take_while(|p| p.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(".")
}

/// A virtual environment rooted at a directory.
///
/// The environment may or may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
}

impl VirtualEnv {
    /// Refer to the environment at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables.
    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(scripts_dir_name())
    }

    /// Path to the environment's interpreter.
    pub fn python(&self) -> PathBuf {
        self.scripts_dir().join(python_file_name())
    }

    /// Name shown in an activated prompt, e.g. `(venv)`.
    pub fn prompt_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Whether the root directory exists at all.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Whether the environment has an interpreter and can be activated.
    pub fn is_usable(&self) -> bool {
        self.python().is_file()
    }

    /// Read `pyvenv.cfg`, if present.
    pub fn config(&self) -> Option<PyvenvCfg> {
        let content = fs::read_to_string(self.root.join("pyvenv.cfg")).ok()?;
        Some(PyvenvCfg::parse(&content))
    }

    /// Command that creates this environment with `interpreter`.
    pub fn create_command(&self, interpreter: &Interpreter) -> ProcessSpec {
        ProcessSpec::new(&interpreter.path)
            .args(["-m", "venv"])
            .arg(self.root.to_string_lossy())
    }

    /// Delete the environment directory.
    pub fn remove(&self) -> Result<()> {
        if !self.exists() {
            return Ok(());
        }
        tracing::debug!("Removing virtual environment at {}", self.root.display());
        fs::remove_dir_all(&self.root).map_err(|e| VenvkeepError::VenvCreationFailed {
            path: self.root.clone(),
            message: format!("could not remove existing environment: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::python::interpreter::{InterpreterSource, PythonVersion};
    use tempfile::TempDir;

    fn make_usable(venv: &VirtualEnv) {
        fs::create_dir_all(venv.scripts_dir()).unwrap();
        fs::write(venv.python(), "").unwrap();
    }

    #[test]
    fn layout_uses_platform_scripts_dir() {
        let venv = VirtualEnv::new("/work/venv");
        if cfg!(target_os = "windows") {
            assert!(venv.python().ends_with("Scripts/python.exe"));
        } else {
            assert_eq!(venv.python(), PathBuf::from("/work/venv/bin/python"));
        }
    }

    #[test]
    fn prompt_name_is_directory_name() {
        assert_eq!(VirtualEnv::new("/work/.venv").prompt_name(), ".venv");
    }

    #[test]
    fn missing_environment_is_neither_existing_nor_usable() {
        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path().join("venv"));
        assert!(!venv.exists());
        assert!(!venv.is_usable());
        assert!(venv.config().is_none());
    }

    #[test]
    fn directory_without_interpreter_is_not_usable() {
        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path().join("venv"));
        fs::create_dir_all(venv.root()).unwrap();
        assert!(venv.exists());
        assert!(!venv.is_usable());
    }

    #[test]
    fn usable_environment() {
        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path().join("venv"));
        make_usable(&venv);
        assert!(venv.is_usable());
    }

    #[test]
    fn parses_pyvenv_cfg() {
        let cfg = PyvenvCfg::parse(
            "home = /usr/bin\n\
             include-system-site-packages = false\n\
             version = 3.12.1\n\
             executable = /usr/bin/python3.12\n\
             command = /usr/bin/python3 -m venv /work/venv\n",
        );
        assert_eq!(cfg.home.as_deref(), Some("/usr/bin"));
        assert_eq!(cfg.version.as_deref(), Some("3.12.1"));
        assert!(!cfg.include_system_site_packages);
        assert_eq!(
            cfg.extra.get("executable").map(String::as_str),
            Some("/usr/bin/python3.12")
        );
        assert!(cfg.extra.contains_key("command"));
    }

    #[test]
    fn parses_version_info_key() {
        let cfg = PyvenvCfg::parse("home = /opt/py\nversion_info = 3.11.7.final.0\n");
        assert_eq!(cfg.version.as_deref(), Some("3.11.7"));
    }

    #[test]
    fn version_key_wins_over_version_info() {
        let cfg = PyvenvCfg::parse("version = 3.12.1\nversion_info = 3.11.7.final.0\n");
        assert_eq!(cfg.version.as_deref(), Some("3.12.1"));
    }

    #[test]
    fn parses_system_site_packages_flag() {
        let cfg = PyvenvCfg::parse("include-system-site-packages = True\n");
        assert!(cfg.include_system_site_packages);
    }

    #[test]
    fn ignores_malformed_lines() {
        let cfg = PyvenvCfg::parse("# comment\n\nnot a pair\nhome=/x\n");
        assert_eq!(cfg.home.as_deref(), Some("/x"));
        assert!(cfg.extra.is_empty());
    }

    #[test]
    fn reads_config_from_disk() {
        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path().join("venv"));
        fs::create_dir_all(venv.root()).unwrap();
        fs::write(venv.root().join("pyvenv.cfg"), "version = 3.10.12\n").unwrap();

        let cfg = venv.config().unwrap();
        assert_eq!(cfg.version.as_deref(), Some("3.10.12"));
    }

    #[test]
    fn create_command_runs_venv_module() {
        let interp = Interpreter {
            path: PathBuf::from("/usr/bin/python3"),
            version: PythonVersion::new(3, 12, 1),
            source: InterpreterSource::Explicit,
        };
        let venv = VirtualEnv::new("/work/venv");
        let spec = venv.create_command(&interp);

        assert_eq!(spec.program, PathBuf::from("/usr/bin/python3"));
        assert_eq!(spec.args, vec!["-m", "venv", "/work/venv"]);
    }

    #[test]
    fn remove_deletes_directory() {
        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path().join("venv"));
        make_usable(&venv);

        venv.remove().unwrap();
        assert!(!venv.exists());
    }

    #[test]
    fn remove_missing_directory_is_ok() {
        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path().join("venv"));
        assert!(venv.remove().is_ok());
    }
}
