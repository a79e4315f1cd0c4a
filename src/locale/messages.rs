//! Message catalog.

use super::Locale;

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    // Titles
    Header,
    StepCheckInterpreter,
    StepEnsureVenv,
    StepActivate,
    StepUpgradePip,
    StepInstallRequirements,
    StepListPackages,
    StepDeactivate,

    // Interpreter
    InterpreterFound { version: &'a str, path: &'a str },
    InterpreterNotFound { tried: &'a str },
    UnsupportedPython { found: &'a str, required: &'a str },

    // Environment
    VenvExists { path: &'a str },
    VenvCreated { path: &'a str },
    VenvCreateFailed,
    VenvIncomplete { path: &'a str },
    VenvMissing { path: &'a str },
    ConfirmRecreate { path: &'a str },
    RecreateDeclined,
    Activated { name: &'a str },
    ActivateFailed,
    Deactivated,

    // pip
    PipUpgraded,
    PipUpgradeFailed,
    ManifestMissing { path: &'a str },
    RequirementsInstalled { count: usize },
    RequirementsFailed,
    PackagesListed { count: usize },
    ListFailed,

    // Step states
    Disabled,
    SkippedNoManifest,
    Blocked,

    // Run
    Completed,
    Failed,
    DryRun,
    WouldRun { command: &'a str },
    PressEnter,

    // Status
    StatusHeader,
    VenvReady { path: &'a str, version: &'a str },
    ManifestFound { path: &'a str, count: usize },
    ManifestAbsent { path: &'a str },
}

impl Message<'_> {
    /// Render for `locale`.
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::English => self.english(),
            Locale::Japanese => self.japanese(),
        }
    }

    fn english(&self) -> String {
        match self {
            Self::Header => "Python virtual environment maintenance".into(),
            Self::StepCheckInterpreter => "Check Python interpreter".into(),
            Self::StepEnsureVenv => "Prepare virtual environment".into(),
            Self::StepActivate => "Activate virtual environment".into(),
            Self::StepUpgradePip => "Upgrade pip".into(),
            Self::StepInstallRequirements => "Install/upgrade requirements".into(),
            Self::StepListPackages => "List installed packages".into(),
            Self::StepDeactivate => "Deactivate virtual environment".into(),

            Self::InterpreterFound { version, path } => format!("Python {} ({})", version, path),
            Self::InterpreterNotFound { tried } => format!(
                "Python is not installed or not on PATH (tried: {}).",
                tried
            ),
            Self::UnsupportedPython { found, required } => format!(
                "Python {} is too old; {} or newer is required.",
                found, required
            ),

            Self::VenvExists { path } => format!("Virtual environment already exists: {}", path),
            Self::VenvCreated { path } => format!("Created virtual environment: {}", path),
            Self::VenvCreateFailed => "Failed to create the virtual environment.".into(),
            Self::VenvIncomplete { path } => format!(
                "{} exists but has no Python interpreter. Re-run with --recreate.",
                path
            ),
            Self::VenvMissing { path } => format!(
                "No virtual environment at {}. Run `venvkeep run` to create it.",
                path
            ),
            Self::ConfirmRecreate { path } => {
                format!("Delete and recreate the virtual environment at {}?", path)
            }
            Self::RecreateDeclined => "Keeping the existing virtual environment.".into(),
            Self::Activated { name } => format!("Activated ({})", name),
            Self::ActivateFailed => "Failed to activate the virtual environment.".into(),
            Self::Deactivated => "Deactivated".into(),

            Self::PipUpgraded => "pip is up to date".into(),
            Self::PipUpgradeFailed => "Failed to upgrade pip.".into(),
            Self::ManifestMissing { path } => {
                format!("{} not found; skipping package installation.", path)
            }
            Self::RequirementsInstalled { count } => {
                format!("{} requirement(s) installed/upgraded", count)
            }
            Self::RequirementsFailed => "Failed to install the requirements.".into(),
            Self::PackagesListed { count } => format!("{} package(s) installed", count),
            Self::ListFailed => "Failed to list installed packages.".into(),

            Self::Disabled => "disabled".into(),
            Self::SkippedNoManifest => "skipped (no manifest)".into(),
            Self::Blocked => "not run (an earlier step failed)".into(),

            Self::Completed => "Maintenance complete".into(),
            Self::Failed => "Maintenance failed".into(),
            Self::DryRun => "Running in dry-run mode: no commands will be executed.".into(),
            Self::WouldRun { command } => format!("would run: {}", command),
            Self::PressEnter => "Press Enter to exit...".into(),

            Self::StatusHeader => "Virtual environment status".into(),
            Self::VenvReady { path, version } => {
                format!("Virtual environment: {} (Python {})", path, version)
            }
            Self::ManifestFound { path, count } => {
                format!("Manifest: {} ({} requirement(s))", path, count)
            }
            Self::ManifestAbsent { path } => format!("No manifest at {}", path),
        }
    }

    fn japanese(&self) -> String {
        match self {
            Self::Header => "Python仮想環境メンテナンス".into(),
            Self::StepCheckInterpreter => "Pythonインタープリタの確認".into(),
            Self::StepEnsureVenv => "仮想環境の準備".into(),
            Self::StepActivate => "仮想環境の有効化".into(),
            Self::StepUpgradePip => "pipのアップグレード".into(),
            Self::StepInstallRequirements => "依存パッケージのインストール/アップグレード".into(),
            Self::StepListPackages => "インストール済みパッケージの一覧".into(),
            Self::StepDeactivate => "仮想環境の無効化".into(),

            Self::InterpreterFound { version, path } => format!("Python {} ({})", version, path),
            Self::InterpreterNotFound { tried } => format!(
                "Pythonがインストールされていないか、PATHが通っていません (試行: {})。",
                tried
            ),
            Self::UnsupportedPython { found, required } => format!(
                "Python {} は古すぎます。{} 以上が必要です。",
                found, required
            ),

            Self::VenvExists { path } => format!("仮想環境は既に存在します: {}", path),
            Self::VenvCreated { path } => format!("仮想環境を作成しました: {}", path),
            Self::VenvCreateFailed => "仮想環境の作成に失敗しました。".into(),
            Self::VenvIncomplete { path } => format!(
                "{} は存在しますがPythonインタープリタがありません。--recreate を付けて再実行してください。",
                path
            ),
            Self::VenvMissing { path } => format!(
                "{} に仮想環境がありません。`venvkeep run` で作成してください。",
                path
            ),
            Self::ConfirmRecreate { path } => {
                format!("{} の仮想環境を削除して作り直しますか?", path)
            }
            Self::RecreateDeclined => "既存の仮想環境をそのまま使用します。".into(),
            Self::Activated { name } => format!("有効化しました ({})", name),
            Self::ActivateFailed => "仮想環境の有効化に失敗しました。".into(),
            Self::Deactivated => "無効化しました".into(),

            Self::PipUpgraded => "pipは最新です".into(),
            Self::PipUpgradeFailed => "pipのアップグレードに失敗しました。".into(),
            Self::ManifestMissing { path } => format!(
                "{} が見つかりません。パッケージのインストールをスキップします。",
                path
            ),
            Self::RequirementsInstalled { count } => {
                format!("{} 件の依存パッケージをインストール/アップグレードしました", count)
            }
            Self::RequirementsFailed => "依存パッケージのインストールに失敗しました。".into(),
            Self::PackagesListed { count } => {
                format!("{} 個のパッケージがインストールされています", count)
            }
            Self::ListFailed => "パッケージ一覧の取得に失敗しました。".into(),

            Self::Disabled => "無効".into(),
            Self::SkippedNoManifest => "スキップ (マニフェストなし)".into(),
            Self::Blocked => "未実行 (前のステップが失敗しました)".into(),

            Self::Completed => "メンテナンスが完了しました".into(),
            Self::Failed => "メンテナンスに失敗しました".into(),
            Self::DryRun => "ドライランモード: コマンドは実行されません。".into(),
            Self::WouldRun { command } => format!("実行予定: {}", command),
            Self::PressEnter => "Enterキーを押すと終了します...".into(),

            Self::StatusHeader => "仮想環境の状態".into(),
            Self::VenvReady { path, version } => {
                format!("仮想環境: {} (Python {})", path, version)
            }
            Self::ManifestFound { path, count } => {
                format!("マニフェスト: {} ({} 件)", path, count)
            }
            Self::ManifestAbsent { path } => format!("{} にマニフェストがありません", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_english_by_locale() {
        let msg = Message::ManifestMissing {
            path: "requirements.txt",
        };
        assert_eq!(
            msg.render(Locale::English),
            "requirements.txt not found; skipping package installation."
        );
    }

    #[test]
    fn renders_japanese_by_locale() {
        let msg = Message::ManifestMissing {
            path: "requirements.txt",
        };
        let text = msg.render(Locale::Japanese);
        assert!(text.starts_with("requirements.txt が見つかりません"));
    }

    #[test]
    fn interpolates_parameters() {
        let msg = Message::InterpreterNotFound {
            tried: "python, python3",
        };
        assert!(msg.render(Locale::English).contains("python, python3"));
        assert!(msg.render(Locale::Japanese).contains("python, python3"));
    }

    #[test]
    fn every_title_differs_between_languages() {
        let titles = [
            Message::Header,
            Message::StepCheckInterpreter,
            Message::StepEnsureVenv,
            Message::StepActivate,
            Message::StepUpgradePip,
            Message::StepInstallRequirements,
            Message::StepListPackages,
            Message::StepDeactivate,
        ];
        for title in titles {
            assert_ne!(
                title.render(Locale::English),
                title.render(Locale::Japanese),
                "{:?}",
                title
            );
        }
    }
}
