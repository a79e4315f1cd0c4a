//! Maintenance steps and their outcomes.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::locale::{Locale, Message};

/// One step of the maintenance sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStep {
    CheckInterpreter,
    EnsureVenv,
    Activate,
    UpgradePip,
    InstallRequirements,
    ListPackages,
    Deactivate,
}

impl MaintenanceStep {
    /// Every step, in order.
    pub const ALL: [MaintenanceStep; 7] = [
        Self::CheckInterpreter,
        Self::EnsureVenv,
        Self::Activate,
        Self::UpgradePip,
        Self::InstallRequirements,
        Self::ListPackages,
        Self::Deactivate,
    ];

    /// Stable identifier used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::CheckInterpreter => "check_interpreter",
            Self::EnsureVenv => "ensure_venv",
            Self::Activate => "activate",
            Self::UpgradePip => "upgrade_pip",
            Self::InstallRequirements => "install_requirements",
            Self::ListPackages => "list_packages",
            Self::Deactivate => "deactivate",
        }
    }

    /// Localized title.
    pub fn title(self, locale: Locale) -> String {
        let message = match self {
            Self::CheckInterpreter => Message::StepCheckInterpreter,
            Self::EnsureVenv => Message::StepEnsureVenv,
            Self::Activate => Message::StepActivate,
            Self::UpgradePip => Message::StepUpgradePip,
            Self::InstallRequirements => Message::StepInstallRequirements,
            Self::ListPackages => Message::StepListPackages,
            Self::Deactivate => Message::StepDeactivate,
        };
        message.render(locale)
    }

    /// 1-based position in the sequence.
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }
}

impl fmt::Display for MaintenanceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    Failed,
    /// Deliberately not run (disabled, already done, no manifest).
    Skipped,
    /// Not run because an earlier step failed.
    Blocked,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: MaintenanceStep,
    pub status: StepStatus,
    /// Wall time, for steps that ran.
    pub duration: Option<Duration>,
    /// Short localized note, e.g. "skipped (no manifest)".
    pub detail: Option<String>,
}

impl StepOutcome {
    pub fn success(step: MaintenanceStep, duration: Duration) -> Self {
        Self {
            step,
            status: StepStatus::Success,
            duration: Some(duration),
            detail: None,
        }
    }

    pub fn failed(step: MaintenanceStep, duration: Duration) -> Self {
        Self {
            step,
            status: StepStatus::Failed,
            duration: Some(duration),
            detail: None,
        }
    }

    pub fn skipped(step: MaintenanceStep, detail: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Skipped,
            duration: None,
            detail: Some(detail.into()),
        }
    }

    pub fn blocked(step: MaintenanceStep, detail: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Blocked,
            duration: None,
            detail: Some(detail.into()),
        }
    }

    /// Attach a detail note.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Whether the step executed (successfully or not).
    pub fn ran(&self) -> bool {
        matches!(self.status, StepStatus::Success | StepStatus::Failed)
    }
}
