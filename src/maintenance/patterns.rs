//! Known failure patterns in pip and venv output.
//!
//! A failed step's captured output is matched against these patterns to
//! print a hint under the error block. Patterns are tried in order and the
//! first match wins, so narrower patterns come first.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::locale::Locale;

/// A recognized cause of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The interpreter lacks `ensurepip` (Debian's split `python3-venv`).
    EnsurepipMissing,
    /// The environment has no pip.
    PipMissing,
    /// A requirement does not exist or has no matching version.
    NoMatchingDistribution { requirement: String },
    /// Requirements pin incompatible versions.
    ResolutionImpossible,
    /// The package index could not be reached.
    Network,
    /// Filesystem permissions.
    PermissionDenied,
    /// PEP 668 marker: pip ran against a system interpreter.
    ExternallyManaged,
}

impl FailureKind {
    /// Hint text for this failure.
    pub fn hint(&self, locale: Locale) -> String {
        match (self, locale) {
            (Self::EnsurepipMissing, Locale::English) => {
                "The venv module is incomplete. Install it (for example `apt install python3-venv`) and retry.".into()
            }
            (Self::EnsurepipMissing, Locale::Japanese) => {
                "venvモジュールが不完全です。`apt install python3-venv` などでインストールしてから再実行してください。".into()
            }
            (Self::PipMissing, Locale::English) => {
                "pip is missing from the environment. Re-run with --recreate.".into()
            }
            (Self::PipMissing, Locale::Japanese) => {
                "仮想環境にpipがありません。--recreate を付けて再実行してください。".into()
            }
            (Self::NoMatchingDistribution { requirement }, Locale::English) => format!(
                "'{}' could not be found on the package index. Check its name and version pin.",
                requirement
            ),
            (Self::NoMatchingDistribution { requirement }, Locale::Japanese) => format!(
                "'{}' がパッケージインデックスに見つかりません。名前とバージョン指定を確認してください。",
                requirement
            ),
            (Self::ResolutionImpossible, Locale::English) => {
                "The requirements conflict. Relax the version pins pip reports above.".into()
            }
            (Self::ResolutionImpossible, Locale::Japanese) => {
                "依存関係が競合しています。上に表示されたバージョン指定を緩めてください。".into()
            }
            (Self::Network, Locale::English) => {
                "pip could not reach the package index. Check the network or proxy settings.".into()
            }
            (Self::Network, Locale::Japanese) => {
                "パッケージインデックスに接続できません。ネットワークまたはプロキシ設定を確認してください。".into()
            }
            (Self::PermissionDenied, Locale::English) => {
                "Permission denied. Check who owns the environment directory.".into()
            }
            (Self::PermissionDenied, Locale::Japanese) => {
                "アクセスが拒否されました。仮想環境ディレクトリの所有者を確認してください。".into()
            }
            (Self::ExternallyManaged, Locale::English) => {
                "pip refused to modify a system-managed Python. The environment is probably broken; re-run with --recreate.".into()
            }
            (Self::ExternallyManaged, Locale::Japanese) => {
                "pipがシステム管理のPythonへの変更を拒否しました。仮想環境が壊れている可能性があります。--recreate を付けて再実行してください。".into()
            }
        }
    }
}

struct ErrorPattern {
    /// Pattern name (for debugging).
    name: &'static str,
    regex: &'static LazyLock<Regex>,
    classify: fn(&Captures) -> FailureKind,
}

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("valid pattern"));
    };
}

lazy_regex!(
    RE_ENSUREPIP,
    r"ensurepip is not available|No module named ensurepip|python3(\.\d+)?-venv"
);
lazy_regex!(RE_PIP_MISSING, r"No module named pip\b");
lazy_regex!(RE_EXTERNALLY_MANAGED, r"externally-managed-environment");
lazy_regex!(
    RE_NO_MATCHING_DIST,
    r"No matching distribution found for (\S+)|Could not find a version that satisfies the requirement (\S+)"
);
lazy_regex!(RE_RESOLUTION, r"ResolutionImpossible|conflicting dependencies");
lazy_regex!(
    RE_NETWORK,
    r"(?i)Failed to establish a new connection|Temporary failure in name resolution|Max retries exceeded|Network is unreachable|Could not fetch URL|SSLError|ConnectTimeoutError"
);
lazy_regex!(
    RE_PERMISSION,
    r"Permission denied|\[Errno 13\]|\[WinError 5\]|Access is denied"
);

static PATTERNS: &[ErrorPattern] = &[
    ErrorPattern {
        name: "ensurepip_missing",
        regex: &RE_ENSUREPIP,
        classify: |_| FailureKind::EnsurepipMissing,
    },
    ErrorPattern {
        name: "pip_missing",
        regex: &RE_PIP_MISSING,
        classify: |_| FailureKind::PipMissing,
    },
    ErrorPattern {
        name: "externally_managed",
        regex: &RE_EXTERNALLY_MANAGED,
        classify: |_| FailureKind::ExternallyManaged,
    },
    ErrorPattern {
        name: "no_matching_distribution",
        regex: &RE_NO_MATCHING_DIST,
        classify: |caps| FailureKind::NoMatchingDistribution {
            requirement: caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        },
    },
    ErrorPattern {
        name: "resolution_impossible",
        regex: &RE_RESOLUTION,
        classify: |_| FailureKind::ResolutionImpossible,
    },
    ErrorPattern {
        name: "network",
        regex: &RE_NETWORK,
        classify: |_| FailureKind::Network,
    },
    ErrorPattern {
        name: "permission_denied",
        regex: &RE_PERMISSION,
        classify: |_| FailureKind::PermissionDenied,
    },
];

/// Classify failure output.
pub fn diagnose(output: &str) -> Option<FailureKind> {
    PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.regex.captures(output)?;
        tracing::debug!("Failure output matched pattern '{}'", pattern.name);
        Some((pattern.classify)(&caps))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_missing_ensurepip() {
        let output = "The virtual environment was not created successfully because ensurepip is not\navailable.  On Debian/Ubuntu systems, you need to install the python3-venv\npackage";
        assert_eq!(diagnose(output), Some(FailureKind::EnsurepipMissing));
    }

    #[test]
    fn detects_missing_pip() {
        let output = "/work/venv/bin/python: No module named pip";
        assert_eq!(diagnose(output), Some(FailureKind::PipMissing));
    }

    #[test]
    fn ensurepip_is_not_mistaken_for_pip() {
        let output = "/usr/bin/python3: No module named ensurepip";
        assert_eq!(diagnose(output), Some(FailureKind::EnsurepipMissing));
    }

    #[test]
    fn extracts_unresolvable_requirement() {
        let output = "ERROR: Could not find a version that satisfies the requirement pandaz>=2.0 (from versions: none)\nERROR: No matching distribution found for pandaz>=2.0";
        assert_eq!(
            diagnose(output),
            Some(FailureKind::NoMatchingDistribution {
                requirement: "pandaz>=2.0".to_string()
            })
        );
    }

    #[test]
    fn detects_conflicts() {
        let output = "ERROR: Cannot install a==1 and b==2 because these package versions have conflicting dependencies.\nERROR: ResolutionImpossible";
        assert_eq!(diagnose(output), Some(FailureKind::ResolutionImpossible));
    }

    #[test]
    fn detects_network_failures() {
        let output = "WARNING: Retrying (Retry(total=4)) after connection broken by 'NewConnectionError(': Failed to establish a new connection: [Errno -3] Temporary failure in name resolution')'";
        assert_eq!(diagnose(output), Some(FailureKind::Network));
    }

    #[test]
    fn detects_permission_errors() {
        let output = "ERROR: Could not install packages due to an OSError: [Errno 13] Permission denied: '/work/venv/lib'";
        assert_eq!(diagnose(output), Some(FailureKind::PermissionDenied));
    }

    #[test]
    fn detects_externally_managed() {
        let output = "error: externally-managed-environment\n\n× This environment is externally managed";
        assert_eq!(diagnose(output), Some(FailureKind::ExternallyManaged));
    }

    #[test]
    fn unknown_output_has_no_diagnosis() {
        assert_eq!(diagnose("Segmentation fault"), None);
        assert_eq!(diagnose(""), None);
    }

    #[test]
    fn hints_are_localized() {
        let kind = FailureKind::NoMatchingDistribution {
            requirement: "pandaz".to_string(),
        };
        assert!(kind.hint(Locale::English).contains("pandaz"));
        assert!(kind.hint(Locale::Japanese).contains("pandaz"));
        assert_ne!(kind.hint(Locale::English), kind.hint(Locale::Japanese));
    }
}
