//! Status command implementation.
//!
//! The `venvkeep status` command reports the interpreter, environment and
//! manifest without changing anything.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::config::ConfigPaths;
use crate::error::{Result, VenvkeepError};
use crate::locale::{Locale, Message};
use crate::maintenance::PipelineOptions;
use crate::python::Manifest;
use crate::shell::{parse_system_path, CommandRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Machine-readable status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub interpreter: InterpreterStatus,
    pub venv: VenvStatus,
    pub manifest: ManifestStatus,
    pub language: Locale,
    /// Configuration files that were found.
    pub config_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterpreterStatus {
    pub found: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    /// Why no interpreter was usable.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenvStatus {
    pub path: PathBuf,
    pub exists: bool,
    /// Has an interpreter and can be activated.
    pub usable: bool,
    /// Python version recorded in `pyvenv.cfg`.
    pub version: Option<String>,
    pub home: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub requirements: usize,
}

/// The status command implementation.
pub struct StatusCommand {
    context: CommandContext,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(context: CommandContext, args: StatusArgs) -> Self {
        Self { context, args }
    }

    /// Collect the status, probing interpreters through `runner`.
    pub fn collect(&self, runner: &dyn CommandRunner) -> Result<StatusReport> {
        let settings = self.context.load_settings()?;
        let locale = self.context.locale(&settings);
        let options = PipelineOptions::from_settings(&settings, &self.context.project_root, locale)?;

        let interpreter = match options.locator(parse_system_path()).locate(runner) {
            Ok(found) => InterpreterStatus {
                found: true,
                path: Some(found.path),
                version: Some(found.version.to_string()),
                error: None,
            },
            Err(e) => InterpreterStatus {
                found: false,
                path: None,
                version: None,
                error: Some(match e {
                    VenvkeepError::UnsupportedPython {
                        found, required, ..
                    } => Message::UnsupportedPython {
                        found: &found,
                        required: &required,
                    }
                    .render(locale),
                    _ => e.to_string(),
                }),
            },
        };

        let venv = options.venv();
        let cfg = venv.config();
        let venv = VenvStatus {
            path: venv.root().to_path_buf(),
            exists: venv.exists(),
            usable: venv.is_usable(),
            version: cfg.as_ref().and_then(|c| c.version.clone()),
            home: cfg.and_then(|c| c.home),
        };

        let manifest = Manifest::load(&options.requirements)?;
        let manifest = ManifestStatus {
            path: options.requirements.clone(),
            exists: manifest.is_some(),
            requirements: manifest.map(|m| m.requirement_count()).unwrap_or(0),
        };

        let config_files = match &self.context.config_path {
            Some(path) => vec![path.clone()],
            None => ConfigPaths::discover(&self.context.project_root)
                .all_existing()
                .into_iter()
                .cloned()
                .collect(),
        };

        Ok(StatusReport {
            interpreter,
            venv,
            manifest,
            language: locale,
            config_files,
        })
    }

    fn show(&self, ui: &mut dyn UserInterface, report: &StatusReport) {
        let locale = report.language;
        ui.show_header(&Message::StatusHeader.render(locale));

        match (&report.interpreter.path, &report.interpreter.version) {
            (Some(path), Some(version)) => ui.success(
                &Message::InterpreterFound {
                    version,
                    path: &path.display().to_string(),
                }
                .render(locale),
            ),
            _ => ui.error(report.interpreter.error.as_deref().unwrap_or_default()),
        }

        let venv_path = report.venv.path.display().to_string();
        if report.venv.usable {
            ui.success(
                &Message::VenvReady {
                    path: &venv_path,
                    version: report.venv.version.as_deref().unwrap_or("?"),
                }
                .render(locale),
            );
        } else if report.venv.exists {
            ui.warning(&Message::VenvIncomplete { path: &venv_path }.render(locale));
        } else {
            ui.warning(&Message::VenvMissing { path: &venv_path }.render(locale));
        }

        let manifest_path = report.manifest.path.display().to_string();
        if report.manifest.exists {
            ui.success(
                &Message::ManifestFound {
                    path: &manifest_path,
                    count: report.manifest.requirements,
                }
                .render(locale),
            );
        } else {
            ui.warning(&Message::ManifestAbsent { path: &manifest_path }.render(locale));
        }

        for path in &report.config_files {
            ui.message(&format!("Config: {}", path.display()));
        }
    }

    /// Collect and display status.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        runner: &dyn CommandRunner,
    ) -> Result<CommandResult> {
        let report = self.collect(runner)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| VenvkeepError::Other(e.into()))?;
            ui.message(&json);
        } else {
            self.show(ui, &report);
        }

        Ok(CommandResult::success())
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(ui, &SystemRunner)
    }
}
