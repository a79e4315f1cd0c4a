//! Status vocabulary shared by every display surface.

use super::theme::Theme;

/// Canonical status kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Completed successfully.
    Success,
    /// Failed.
    Failed,
    /// Skipped on purpose (disabled, nothing to do).
    Skipped,
    /// Not run yet.
    Pending,
    /// Currently running.
    Running,
    /// Not run because an earlier step failed.
    Blocked,
    /// Non-fatal warning.
    Warning,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Pending => "◌",
            Self::Running => "◆",
            Self::Blocked => "⊘",
            Self::Warning => "⚠",
        }
    }

    /// Bracketed text for plain output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
            Self::Pending => "[pending]",
            Self::Running => "[run]",
            Self::Blocked => "[blocked]",
            Self::Warning => "[warn]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &Theme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped | Self::Pending => theme.dim.apply_to(icon).to_string(),
            Self::Running => theme.info.apply_to(icon).to_string(),
            Self::Blocked => theme.blocked.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Styled icon followed by `msg`.
    pub fn format(self, theme: &Theme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Bracketed label followed by `msg`.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<crate::maintenance::StepStatus> for StatusKind {
    fn from(status: crate::maintenance::StepStatus) -> Self {
        use crate::maintenance::StepStatus;
        match status {
            StepStatus::Success => Self::Success,
            StepStatus::Failed => Self::Failed,
            StepStatus::Skipped => Self::Skipped,
            StepStatus::Blocked => Self::Blocked,
        }
    }
}
