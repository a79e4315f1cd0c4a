//! Python interpreter discovery.
//!
//! An interpreter is either given explicitly (a path, or a bare name to look
//! up on PATH) or found by trying a list of candidate names in order. A
//! candidate only counts once `<candidate> --version` succeeds and reports a
//! parseable version, so stub launchers that merely exist on PATH are skipped.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, VenvkeepError};
use crate::shell::{resolve_tool_path, CommandOptions, CommandRunner, ProcessSpec};

static RE_PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Python\s+(\d+)\.(\d+)(?:\.(\d+))?").expect("valid regex"));

/// A Python version as reported by `python --version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl PythonVersion {
    /// Create a version with an explicit patch component.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// Extract the version from `--version` output.
    ///
    /// Python 2 prints its version to stderr, so callers pass both streams.
    pub fn from_version_output(output: &str) -> Option<Self> {
        let caps = RE_PYTHON_VERSION.captures(output)?;
        Some(Self {
            major: caps.get(1)?.as_str().parse().ok()?,
            minor: caps.get(2)?.as_str().parse().ok()?,
            patch: caps.get(3).and_then(|m| m.as_str().parse().ok()),
        })
    }

    /// Whether this version satisfies a minimum.
    ///
    /// A minimum without a patch component ignores the patch level.
    pub fn satisfies(&self, minimum: &PythonVersion) -> bool {
        match (self.major, self.minor).cmp(&(minimum.major, minimum.minor)) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match minimum.patch {
                None => true,
                Some(min_patch) => self.patch.unwrap_or(0) >= min_patch,
            },
        }
    }
}

impl FromStr for PythonVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        let num = |p: &str| {
            p.parse::<u32>()
                .map_err(|_| format!("invalid Python version: {}", s))
        };
        match parts.as_slice() {
            [major, minor] => Ok(Self {
                major: num(major)?,
                minor: num(minor)?,
                patch: None,
            }),
            [major, minor, patch] => Ok(Self::new(num(major)?, num(minor)?, num(patch)?)),
            _ => Err(format!("invalid Python version: {}", s)),
        }
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// How an interpreter was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterSource {
    /// Given with `--python` or `settings.python`.
    Explicit,
    /// Found by searching PATH for this candidate name.
    Candidate(String),
}

/// A verified Python interpreter.
#[derive(Debug, Clone)]
pub struct Interpreter {
    /// Executable path.
    pub path: PathBuf,
    /// Reported version.
    pub version: PythonVersion,
    /// How it was found.
    pub source: InterpreterSource,
}

impl Interpreter {
    /// Ask an executable for its version.
    ///
    /// Returns `None` if the executable cannot be run, exits non-zero, or
    /// prints something that is not a Python version.
    pub fn probe(path: &Path, runner: &dyn CommandRunner) -> Option<PythonVersion> {
        let spec = ProcessSpec::new(path).arg("--version");
        let result = match runner.run(&spec, &CommandOptions::captured(), None) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", path.display(), e);
                return None;
            }
        };
        if !result.success {
            tracing::debug!(
                "Probe of {} exited with {:?}",
                path.display(),
                result.exit_code
            );
            return None;
        }
        PythonVersion::from_version_output(&format!("{}\n{}", result.stdout, result.stderr))
    }
}

/// Default candidate names for this platform.
pub fn default_candidates() -> Vec<String> {
    if cfg!(target_os = "windows") {
        vec!["python".to_string(), "py".to_string()]
    } else {
        vec!["python".to_string(), "python3".to_string()]
    }
}

/// Finds a usable interpreter.
#[derive(Debug, Clone)]
pub struct InterpreterLocator {
    explicit: Option<PathBuf>,
    candidates: Vec<String>,
    search_path: Vec<PathBuf>,
    minimum: Option<PythonVersion>,
}

impl InterpreterLocator {
    /// Create a locator that tries `candidates` on `search_path`.
    pub fn new(candidates: Vec<String>, search_path: Vec<PathBuf>) -> Self {
        Self {
            explicit: None,
            candidates,
            search_path,
            minimum: None,
        }
    }

    /// Use this interpreter instead of searching candidates.
    pub fn with_explicit(mut self, explicit: Option<PathBuf>) -> Self {
        self.explicit = explicit;
        self
    }

    /// Reject interpreters older than `minimum`.
    pub fn with_minimum(mut self, minimum: Option<PythonVersion>) -> Self {
        self.minimum = minimum;
        self
    }

    /// Everything this locator will try, for messages.
    pub fn describe_attempts(&self) -> String {
        match &self.explicit {
            Some(path) => path.display().to_string(),
            None => self.candidates.join(", "),
        }
    }

    /// Locate an interpreter.
    pub fn locate(&self, runner: &dyn CommandRunner) -> Result<Interpreter> {
        if let Some(explicit) = &self.explicit {
            return self.locate_explicit(explicit, runner);
        }

        let mut too_old: Option<(PathBuf, PythonVersion)> = None;

        for candidate in &self.candidates {
            let Some(path) = resolve_tool_path(candidate, &self.search_path) else {
                tracing::debug!("Candidate '{}' not on PATH", candidate);
                continue;
            };
            let Some(version) = Interpreter::probe(&path, runner) else {
                continue;
            };
            if let Some(min) = &self.minimum {
                if !version.satisfies(min) {
                    tracing::debug!(
                        "Skipping {} ({}): older than {}",
                        path.display(),
                        version,
                        min
                    );
                    too_old.get_or_insert((path, version));
                    continue;
                }
            }
            tracing::debug!("Using {} ({})", path.display(), version);
            return Ok(Interpreter {
                path,
                version,
                source: InterpreterSource::Candidate(candidate.clone()),
            });
        }

        match (too_old, &self.minimum) {
            (Some((path, found)), Some(min)) => Err(VenvkeepError::UnsupportedPython {
                path,
                found: found.to_string(),
                required: min.to_string(),
            }),
            _ => Err(VenvkeepError::InterpreterNotFound {
                tried: self.describe_attempts(),
            }),
        }
    }

    fn locate_explicit(&self, explicit: &Path, runner: &dyn CommandRunner) -> Result<Interpreter> {
        let not_found = || VenvkeepError::InterpreterNotFound {
            tried: explicit.display().to_string(),
        };

        // A bare name ("python3.12") is looked up on PATH like a candidate.
        let path = if explicit.components().count() == 1 && !explicit.is_file() {
            resolve_tool_path(&explicit.to_string_lossy(), &self.search_path)
                .ok_or_else(not_found)?
        } else if explicit.is_file() {
            explicit.to_path_buf()
        } else {
            return Err(not_found());
        };

        let version = Interpreter::probe(&path, runner).ok_or_else(not_found)?;

        if let Some(min) = &self.minimum {
            if !version.satisfies(min) {
                return Err(VenvkeepError::UnsupportedPython {
                    path,
                    found: version.to_string(),
                    required: min.to_string(),
                });
            }
        }

        Ok(Interpreter {
            path,
            version,
            source: InterpreterSource::Explicit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{MockResponse, MockRunner};
    use std::fs;
    use tempfile::TempDir;

    fn fake_executable(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    #[test]
    fn parses_version_output() {
        assert_eq!(
            PythonVersion::from_version_output("Python 3.12.1\n"),
            Some(PythonVersion::new(3, 12, 1))
        );
        assert_eq!(
            PythonVersion::from_version_output("Python 2.7.18"),
            Some(PythonVersion::new(2, 7, 18))
        );
    }

    #[test]
    fn parses_prerelease_version_output() {
        let v = PythonVersion::from_version_output("Python 3.13.0rc2").unwrap();
        assert_eq!(v, PythonVersion::new(3, 13, 0));
    }

    #[test]
    fn rejects_non_python_output() {
        assert!(PythonVersion::from_version_output("Microsoft Store").is_none());
        assert!(PythonVersion::from_version_output("").is_none());
    }

    #[test]
    fn parses_version_strings() {
        assert_eq!(
            "3.8".parse::<PythonVersion>(),
            Ok(PythonVersion {
                major: 3,
                minor: 8,
                patch: None
            })
        );
        assert_eq!(
            "3.11.4".parse::<PythonVersion>(),
            Ok(PythonVersion::new(3, 11, 4))
        );
        assert!("3".parse::<PythonVersion>().is_err());
        assert!("three.eight".parse::<PythonVersion>().is_err());
    }

    #[test]
    fn displays_versions() {
        assert_eq!(PythonVersion::new(3, 12, 1).to_string(), "3.12.1");
        assert_eq!("3.8".parse::<PythonVersion>().unwrap().to_string(), "3.8");
    }

    #[test]
    fn satisfies_minimum() {
        let min: PythonVersion = "3.8".parse().unwrap();
        assert!(PythonVersion::new(3, 8, 0).satisfies(&min));
        assert!(PythonVersion::new(3, 12, 1).satisfies(&min));
        assert!(PythonVersion::new(4, 0, 0).satisfies(&min));
        assert!(!PythonVersion::new(3, 7, 17).satisfies(&min));
        assert!(!PythonVersion::new(2, 7, 18).satisfies(&min));

        let min_patch = PythonVersion::new(3, 10, 4);
        assert!(!PythonVersion::new(3, 10, 3).satisfies(&min_patch));
        assert!(PythonVersion::new(3, 10, 4).satisfies(&min_patch));
    }

    #[test]
    fn probe_rejects_non_zero_exit() {
        let runner = MockRunner::new();
        runner.respond("--version", MockResponse::fail(1, "Python 3.12.0"));

        let temp = TempDir::new().unwrap();
        let py = fake_executable(temp.path(), "python");
        assert!(Interpreter::probe(&py, &runner).is_none());
    }

    #[test]
    fn locate_tries_candidates_in_order() {
        let temp = TempDir::new().unwrap();
        fake_executable(temp.path(), "python3");

        let runner = MockRunner::new();
        runner.respond("--version", MockResponse::ok("Python 3.11.2"));

        let locator = InterpreterLocator::new(
            vec!["python".to_string(), "python3".to_string()],
            vec![temp.path().to_path_buf()],
        );
        let interp = locator.locate(&runner).unwrap();

        assert_eq!(interp.path, temp.path().join("python3"));
        assert_eq!(interp.version, PythonVersion::new(3, 11, 2));
        assert_eq!(
            interp.source,
            InterpreterSource::Candidate("python3".to_string())
        );
    }

    #[test]
    fn locate_skips_candidates_that_fail_to_report_a_version() {
        let temp = TempDir::new().unwrap();
        fake_executable(temp.path(), "python");
        fake_executable(temp.path(), "python3");

        let runner = MockRunner::new();
        let stub = temp.path().join("python").display().to_string();
        runner.respond(
            &format!("{} --version", stub),
            MockResponse::fail(9009, "Python was not found"),
        );
        runner.respond("--version", MockResponse::ok("Python 3.12.0"));

        let locator = InterpreterLocator::new(
            vec!["python".to_string(), "python3".to_string()],
            vec![temp.path().to_path_buf()],
        );
        let interp = locator.locate(&runner).unwrap();
        assert_eq!(interp.path, temp.path().join("python3"));
    }

    #[test]
    fn locate_reports_all_candidates_when_none_found() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();

        let locator = InterpreterLocator::new(
            vec!["python".to_string(), "python3".to_string()],
            vec![temp.path().to_path_buf()],
        );
        let err = locator.locate(&runner).unwrap_err();

        match err {
            VenvkeepError::InterpreterNotFound { tried } => {
                assert_eq!(tried, "python, python3");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn locate_rejects_too_old_candidates() {
        let temp = TempDir::new().unwrap();
        fake_executable(temp.path(), "python");

        let runner = MockRunner::new();
        runner.respond("--version", MockResponse::ok("Python 3.6.9"));

        let locator =
            InterpreterLocator::new(vec!["python".to_string()], vec![temp.path().to_path_buf()])
                .with_minimum(Some("3.8".parse().unwrap()));
        let err = locator.locate(&runner).unwrap_err();

        assert!(matches!(err, VenvkeepError::UnsupportedPython { .. }));
    }

    #[test]
    fn locate_explicit_path() {
        let temp = TempDir::new().unwrap();
        let py = fake_executable(temp.path(), "mypython");

        let runner = MockRunner::new();
        runner.respond("--version", MockResponse::ok("Python 3.10.12"));

        let locator = InterpreterLocator::new(default_candidates(), Vec::new())
            .with_explicit(Some(py.clone()));
        let interp = locator.locate(&runner).unwrap();

        assert_eq!(interp.path, py);
        assert_eq!(interp.source, InterpreterSource::Explicit);
    }

    #[test]
    fn locate_explicit_bare_name_uses_search_path() {
        let temp = TempDir::new().unwrap();
        fake_executable(temp.path(), "python3.12");

        let runner = MockRunner::new();
        runner.respond("--version", MockResponse::ok("Python 3.12.3"));

        let locator = InterpreterLocator::new(Vec::new(), vec![temp.path().to_path_buf()])
            .with_explicit(Some(PathBuf::from("python3.12")));
        let interp = locator.locate(&runner).unwrap();

        assert_eq!(interp.path, temp.path().join("python3.12"));
    }

    #[test]
    fn locate_explicit_missing_file() {
        let runner = MockRunner::new();
        let locator = InterpreterLocator::new(default_candidates(), Vec::new())
            .with_explicit(Some(PathBuf::from("/no/such/python")));

        let err = locator.locate(&runner).unwrap_err();
        match err {
            VenvkeepError::InterpreterNotFound { tried } => {
                assert!(tried.contains("/no/such/python"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_candidates_are_not_empty() {
        assert!(!default_candidates().is_empty());
    }
}
