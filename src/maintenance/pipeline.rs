//! The maintenance pipeline.
//!
//! Runs the steps of [`MaintenanceStep::ALL`] strictly in order. A failure
//! before activation ends the run; a failure after activation skips the
//! remaining pip work but still deactivates. Steps that never ran are
//! reported as blocked.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{Result, VenvkeepError};
use crate::locale::{Locale, Message};
use crate::python::{
    parse_package_list, pip, Activation, InstalledPackage, Interpreter, InterpreterLocator,
    Manifest, PythonVersion, VirtualEnv,
};
use crate::shell::{parse_system_path, CommandOptions, CommandResult, CommandRunner, ProcessSpec};
use crate::ui::{
    format_duration, hints, live_output_callback, passthrough_callback, OutputMode, Prompt,
    RunSummary, StatusKind, StepSummary, Table, UserInterface,
};

use super::patterns::diagnose;
use super::step::{MaintenanceStep, StepOutcome, StepStatus};

/// Resolved inputs for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Working directory for every command.
    pub project_root: PathBuf,
    /// Environment directory.
    pub venv_dir: PathBuf,
    /// Manifest path.
    pub requirements: PathBuf,
    /// Explicit interpreter, bypassing the candidate search.
    pub python: Option<PathBuf>,
    pub candidates: Vec<String>,
    pub min_python: Option<PythonVersion>,
    pub upgrade_pip: bool,
    pub list_packages: bool,
    /// Appended to `pip install` invocations.
    pub pip_args: Vec<String>,
    /// Extra variables for every command.
    pub env: HashMap<String, String>,
    /// Delete an existing environment before creating it.
    pub recreate: bool,
    pub locale: Locale,
}

impl PipelineOptions {
    /// Build options from merged settings.
    ///
    /// Relative paths are taken relative to `project_root`, which is itself
    /// made absolute against the current directory.
    pub fn from_settings(settings: &Settings, project_root: &Path, locale: Locale) -> Result<Self> {
        let project_root = &std::path::absolute(project_root)?;
        let min_python = settings
            .min_python
            .as_deref()
            .map(|v| {
                v.parse::<PythonVersion>()
                    .map_err(|message| VenvkeepError::ConfigValidationError {
                        message: format!("settings.min_python: {}", message),
                    })
            })
            .transpose()?;

        Ok(Self {
            project_root: project_root.to_path_buf(),
            venv_dir: project_root.join(&settings.venv_dir),
            requirements: project_root.join(&settings.requirements),
            python: settings
                .python
                .as_deref()
                .map(|p| resolve_python(p, project_root)),
            candidates: settings.candidates.clone(),
            min_python,
            upgrade_pip: settings.upgrade_pip,
            list_packages: settings.list_packages,
            pip_args: settings.pip_args.clone(),
            env: settings.env.clone(),
            recreate: false,
            locale,
        })
    }

    /// The environment being maintained.
    pub fn venv(&self) -> VirtualEnv {
        VirtualEnv::new(&self.venv_dir)
    }

    /// Interpreter locator for these options.
    pub fn locator(&self, search_path: Vec<PathBuf>) -> InterpreterLocator {
        InterpreterLocator::new(self.candidates.clone(), search_path)
            .with_explicit(self.python.clone())
            .with_minimum(self.min_python)
    }

    fn base_command_options(&self) -> CommandOptions {
        CommandOptions {
            cwd: Some(self.project_root.clone()),
            env: self.env.clone(),
            ..CommandOptions::captured()
        }
    }
}

/// Bare names ("python3.12") stay names; relative paths hang off the project.
fn resolve_python(python: &Path, project_root: &Path) -> PathBuf {
    if python.components().count() == 1 {
        python.to_path_buf()
    } else {
        project_root.join(python)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One outcome per step, in step order.
    pub outcomes: Vec<StepOutcome>,
    /// Parsed `pip list`, when listing ran and its output was JSON.
    pub packages: Option<Vec<InstalledPackage>>,
    pub total_duration: Duration,
    pub dry_run: bool,
}

impl RunReport {
    /// Whether no step failed.
    pub fn success(&self) -> bool {
        !self
            .outcomes
            .iter()
            .any(|o| o.status == StepStatus::Failed)
    }

    /// Outcome of `step`.
    pub fn outcome(&self, step: MaintenanceStep) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step == step)
    }

    /// Status of `step`.
    pub fn status(&self, step: MaintenanceStep) -> Option<StepStatus> {
        self.outcome(step).map(|o| o.status)
    }

    /// Process exit code: 0 on success, 1 when a step failed.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    /// Summary for display.
    pub fn summary(&self, locale: Locale) -> RunSummary {
        let step_results = self
            .outcomes
            .iter()
            .map(|o| StepSummary {
                name: o.step.title(locale),
                status: StatusKind::from(o.status),
                duration: o.duration,
                detail: o.detail.clone(),
            })
            .collect();

        let headline = if self.success() {
            Message::Completed
        } else {
            Message::Failed
        };

        RunSummary {
            headline: headline.render(locale),
            step_results,
            total_duration: self.total_duration,
            steps_run: self.outcomes.iter().filter(|o| o.ran()).count(),
            steps_skipped: self
                .outcomes
                .iter()
                .filter(|o| o.status == StepStatus::Skipped)
                .count(),
            success: self.success(),
            failed_steps: self
                .outcomes
                .iter()
                .filter(|o| o.status == StepStatus::Failed)
                .map(|o| o.step.title(locale))
                .collect(),
        }
    }
}

/// Result of installing the manifest.
enum InstallResult {
    Installed,
    NoManifest,
    Failed,
}

/// Runs the maintenance steps.
pub struct Pipeline<'a> {
    options: PipelineOptions,
    runner: &'a dyn CommandRunner,
    probe_runner: &'a dyn CommandRunner,
    search_path: Vec<PathBuf>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline that runs commands through `runner`.
    pub fn new(options: PipelineOptions, runner: &'a dyn CommandRunner) -> Self {
        Self {
            options,
            runner,
            probe_runner: runner,
            search_path: parse_system_path(),
        }
    }

    /// Use `runner` for interpreter `--version` probes.
    ///
    /// Dry runs probe for real so the interpreter check stays meaningful.
    pub fn with_probe_runner(mut self, runner: &'a dyn CommandRunner) -> Self {
        self.probe_runner = runner;
        self
    }

    /// Directories searched for interpreter candidates.
    pub fn with_search_path(mut self, search_path: Vec<PathBuf>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    fn locale(&self) -> Locale {
        self.options.locale
    }

    fn dry_run(&self) -> bool {
        self.runner.is_dry_run()
    }

    /// Run every step.
    pub fn run(&self, ui: &mut dyn UserInterface) -> RunReport {
        let started = Instant::now();
        let locale = self.locale();
        let mut outcomes = Vec::new();

        ui.show_header(&Message::Header.render(locale));
        if self.dry_run() {
            ui.warning(&Message::DryRun.render(locale));
        }
        debug!(
            "Maintaining {} with {}",
            self.options.venv_dir.display(),
            self.options.requirements.display()
        );

        let Some(interpreter) = self.check_interpreter(ui, &mut outcomes) else {
            return self.finish(outcomes, None, started);
        };
        let Some(venv) = self.ensure_venv(ui, &interpreter, &mut outcomes) else {
            return self.finish(outcomes, None, started);
        };
        let Some(activation) = self.activate(ui, &venv, &mut outcomes) else {
            return self.finish(outcomes, None, started);
        };

        let packages = self.maintain(ui, &activation, &mut outcomes);

        self.block_until(&mut outcomes, Some(MaintenanceStep::Deactivate));
        self.deactivate(ui, activation, &mut outcomes);

        self.finish(outcomes, packages, started)
    }

    fn finish(
        &self,
        mut outcomes: Vec<StepOutcome>,
        packages: Option<Vec<InstalledPackage>>,
        started: Instant,
    ) -> RunReport {
        self.block_until(&mut outcomes, None);
        let report = RunReport {
            outcomes,
            packages,
            total_duration: started.elapsed(),
            dry_run: self.dry_run(),
        };
        debug!(
            "Run finished: {} in {}",
            if report.success() { "ok" } else { "failed" },
            format_duration(report.total_duration)
        );
        report
    }

    /// Record every step before `until` that has no outcome as blocked.
    fn block_until(&self, outcomes: &mut Vec<StepOutcome>, until: Option<MaintenanceStep>) {
        let detail = Message::Blocked.render(self.locale());
        for step in MaintenanceStep::ALL {
            if Some(step) == until {
                break;
            }
            if !outcomes.iter().any(|o| o.step == step) {
                debug!("Step {} blocked", step);
                outcomes.push(StepOutcome::blocked(step, detail.clone()));
            }
        }
    }

    fn announce(&self, ui: &mut dyn UserInterface, step: MaintenanceStep) {
        debug!("Step {}", step);
        ui.show_step(
            step.index(),
            MaintenanceStep::ALL.len(),
            &step.title(self.locale()),
        );
    }

    fn check_interpreter(
        &self,
        ui: &mut dyn UserInterface,
        outcomes: &mut Vec<StepOutcome>,
    ) -> Option<Interpreter> {
        let step = MaintenanceStep::CheckInterpreter;
        let locale = self.locale();
        self.announce(ui, step);

        let started = Instant::now();
        let locator = self.options.locator(self.search_path.clone());

        match locator.locate(self.probe_runner) {
            Ok(interpreter) => {
                let version = interpreter.version.to_string();
                let path = interpreter.path.display().to_string();
                ui.success(
                    &Message::InterpreterFound {
                        version: &version,
                        path: &path,
                    }
                    .render(locale),
                );
                outcomes.push(
                    StepOutcome::success(step, started.elapsed())
                        .with_detail(format!("Python {}", version)),
                );
                Some(interpreter)
            }
            Err(VenvkeepError::UnsupportedPython {
                found, required, ..
            }) => {
                ui.error(
                    &Message::UnsupportedPython {
                        found: &found,
                        required: &required,
                    }
                    .render(locale),
                );
                outcomes.push(StepOutcome::failed(step, started.elapsed()));
                None
            }
            Err(e) => {
                debug!("Interpreter lookup failed: {}", e);
                ui.error(
                    &Message::InterpreterNotFound {
                        tried: &locator.describe_attempts(),
                    }
                    .render(locale),
                );
                outcomes.push(StepOutcome::failed(step, started.elapsed()));
                None
            }
        }
    }

    fn ensure_venv(
        &self,
        ui: &mut dyn UserInterface,
        interpreter: &Interpreter,
        outcomes: &mut Vec<StepOutcome>,
    ) -> Option<VirtualEnv> {
        let step = MaintenanceStep::EnsureVenv;
        let locale = self.locale();
        self.announce(ui, step);

        let venv = self.options.venv();
        let path = venv.root().display().to_string();

        if venv.exists() {
            if !self.options.recreate {
                let message = Message::VenvExists { path: &path }.render(locale);
                ui.message(&message);
                outcomes.push(StepOutcome::skipped(step, message));
                return Some(venv);
            }

            let started = Instant::now();
            match self.confirm_recreate(ui, &path) {
                Ok(true) => {}
                Ok(false) => {
                    ui.message(&Message::RecreateDeclined.render(locale));
                    outcomes.push(StepOutcome::skipped(
                        step,
                        Message::VenvExists { path: &path }.render(locale),
                    ));
                    return Some(venv);
                }
                Err(e) => {
                    ui.error(&e.to_string());
                    outcomes.push(StepOutcome::failed(step, started.elapsed()));
                    return None;
                }
            }

            if self.dry_run() {
                ui.message(
                    &Message::WouldRun {
                        command: &format!("remove {}", path),
                    }
                    .render(locale),
                );
            } else if let Err(e) = venv.remove() {
                warn!("Could not remove {}: {}", path, e);
                ui.error(&Message::VenvCreateFailed.render(locale));
                ui.error(&e.to_string());
                outcomes.push(StepOutcome::failed(step, started.elapsed()));
                return None;
            }
        }

        let spec = venv.create_command(interpreter);
        let (outcome, _) = self.run_tool(
            ui,
            step,
            &spec,
            &self.options.base_command_options(),
            true,
            Message::VenvCreateFailed,
            |_| Message::VenvCreated { path: &path }.render(locale),
        );
        let created = outcome.status == StepStatus::Success;
        outcomes.push(outcome);

        created.then_some(venv)
    }

    fn confirm_recreate(&self, ui: &mut dyn UserInterface, path: &str) -> Result<bool> {
        if !ui.is_interactive() {
            return Ok(true);
        }
        ui.confirm(&Prompt {
            key: "recreate".to_string(),
            question: Message::ConfirmRecreate { path }.render(self.locale()),
            default: true,
        })
    }

    fn activate(
        &self,
        ui: &mut dyn UserInterface,
        venv: &VirtualEnv,
        outcomes: &mut Vec<StepOutcome>,
    ) -> Option<Activation> {
        let step = MaintenanceStep::Activate;
        let locale = self.locale();
        self.announce(ui, step);

        let started = Instant::now();
        let activated = if self.dry_run() {
            Activation::activate_unchecked(venv)
        } else {
            Activation::activate(venv)
        };

        match activated {
            Ok(activation) => {
                ui.success(
                    &Message::Activated {
                        name: &venv.prompt_name(),
                    }
                    .render(locale),
                );
                outcomes.push(StepOutcome::success(step, started.elapsed()));
                Some(activation)
            }
            Err(e) => {
                debug!("Activation failed: {}", e);
                ui.error(&Message::ActivateFailed.render(locale));
                if venv.exists() && !venv.is_usable() {
                    ui.error(
                        &Message::VenvIncomplete {
                            path: &venv.root().display().to_string(),
                        }
                        .render(locale),
                    );
                    ui.show_hint(hints::recreate_environment(locale));
                }
                outcomes.push(StepOutcome::failed(step, started.elapsed()));
                None
            }
        }
    }

    /// The pip steps. Returns the parsed package list when listing ran.
    fn maintain(
        &self,
        ui: &mut dyn UserInterface,
        activation: &Activation,
        outcomes: &mut Vec<StepOutcome>,
    ) -> Option<Vec<InstalledPackage>> {
        let python = activation.venv().python();
        let options = activation.command_options(&self.options.env, &self.options.project_root);

        if !self.upgrade_pip(ui, &python, &options, outcomes) {
            return None;
        }
        match self.install_requirements(ui, &python, &options, outcomes) {
            InstallResult::Installed => self.list_packages(ui, &python, &options, outcomes),
            InstallResult::NoManifest | InstallResult::Failed => None,
        }
    }

    fn upgrade_pip(
        &self,
        ui: &mut dyn UserInterface,
        python: &Path,
        options: &CommandOptions,
        outcomes: &mut Vec<StepOutcome>,
    ) -> bool {
        let step = MaintenanceStep::UpgradePip;
        let locale = self.locale();
        self.announce(ui, step);

        if !self.options.upgrade_pip {
            let detail = Message::Disabled.render(locale);
            show_disabled(ui, &step.title(locale), &detail);
            outcomes.push(StepOutcome::skipped(step, detail));
            return true;
        }

        let spec = pip::upgrade_pip(python, &self.options.pip_args);
        let (outcome, _) = self.run_tool(
            ui,
            step,
            &spec,
            options,
            true,
            Message::PipUpgradeFailed,
            |_| Message::PipUpgraded.render(locale),
        );
        let ok = outcome.status == StepStatus::Success;
        outcomes.push(outcome);
        ok
    }

    fn install_requirements(
        &self,
        ui: &mut dyn UserInterface,
        python: &Path,
        options: &CommandOptions,
        outcomes: &mut Vec<StepOutcome>,
    ) -> InstallResult {
        let step = MaintenanceStep::InstallRequirements;
        let locale = self.locale();
        self.announce(ui, step);

        let started = Instant::now();
        let manifest = match Manifest::load(&self.options.requirements) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                ui.warning(
                    &Message::ManifestMissing {
                        path: &self.manifest_display(),
                    }
                    .render(locale),
                );
                let detail = Message::SkippedNoManifest.render(locale);
                outcomes.push(StepOutcome::skipped(step, detail.clone()));
                outcomes.push(StepOutcome::skipped(MaintenanceStep::ListPackages, detail));
                return InstallResult::NoManifest;
            }
            Err(e) => {
                ui.error(&Message::RequirementsFailed.render(locale));
                ui.error(&e.to_string());
                outcomes.push(StepOutcome::failed(step, started.elapsed()));
                return InstallResult::Failed;
            }
        };
        debug!(
            "{} lists {} requirement(s)",
            manifest.path().display(),
            manifest.requirement_count()
        );

        let spec = pip::install_requirements(python, manifest.path(), &self.options.pip_args);
        let count = manifest.requirement_count();
        let (outcome, _) = self.run_tool(
            ui,
            step,
            &spec,
            options,
            true,
            Message::RequirementsFailed,
            |_| Message::RequirementsInstalled { count }.render(locale),
        );
        let ok = outcome.status == StepStatus::Success;
        outcomes.push(outcome);

        if ok {
            InstallResult::Installed
        } else {
            InstallResult::Failed
        }
    }

    fn list_packages(
        &self,
        ui: &mut dyn UserInterface,
        python: &Path,
        options: &CommandOptions,
        outcomes: &mut Vec<StepOutcome>,
    ) -> Option<Vec<InstalledPackage>> {
        let step = MaintenanceStep::ListPackages;
        let locale = self.locale();
        self.announce(ui, step);

        if !self.options.list_packages {
            let detail = Message::Disabled.render(locale);
            show_disabled(ui, &step.title(locale), &detail);
            outcomes.push(StepOutcome::skipped(step, detail));
            return None;
        }

        let mut parsed = None;
        let spec = pip::list_packages(python);
        let (outcome, result) = self.run_tool(
            ui,
            step,
            &spec,
            options,
            false,
            Message::ListFailed,
            |result| match parse_package_list(&result.stdout) {
                Ok(packages) => {
                    let message = Message::PackagesListed {
                        count: packages.len(),
                    }
                    .render(locale);
                    parsed = Some(packages);
                    message
                }
                Err(e) => {
                    debug!("Could not parse pip list output: {}", e);
                    step.title(locale)
                }
            },
        );
        outcomes.push(outcome);

        match (&parsed, result) {
            (Some(packages), _) => {
                let table = Table::packages(packages);
                if !table.is_empty() {
                    ui.show_block(&table.render());
                }
            }
            (None, Some(result)) if result.success && !result.stdout.trim().is_empty() => {
                ui.show_block(result.stdout.trim_end());
            }
            _ => {}
        }

        parsed
    }

    fn deactivate(
        &self,
        ui: &mut dyn UserInterface,
        activation: Activation,
        outcomes: &mut Vec<StepOutcome>,
    ) {
        let step = MaintenanceStep::Deactivate;
        self.announce(ui, step);

        let started = Instant::now();
        let root = activation.deactivate();
        debug!("Left {}", root.display());
        ui.success(&Message::Deactivated.render(self.locale()));
        outcomes.push(StepOutcome::success(step, started.elapsed()));
    }

    /// Run one external command under a spinner.
    ///
    /// On failure the command, its output and a diagnosis hint are shown.
    #[allow(clippy::too_many_arguments)]
    fn run_tool<F>(
        &self,
        ui: &mut dyn UserInterface,
        step: MaintenanceStep,
        spec: &ProcessSpec,
        options: &CommandOptions,
        stream: bool,
        failure: Message<'_>,
        on_success: F,
    ) -> (StepOutcome, Option<CommandResult>)
    where
        F: FnOnce(&CommandResult) -> String,
    {
        let locale = self.locale();
        let title = step.title(locale);
        let command = spec.to_string();

        debug!("Running {}", command);
        if self.dry_run() {
            ui.message(&Message::WouldRun { command: &command }.render(locale));
        }

        let mut spinner = ui.start_spinner(&title);
        let mode = ui.output_mode();
        let callback = if stream {
            match mode {
                OutputMode::Verbose => Some(passthrough_callback(spinner.progress_bar())),
                OutputMode::Normal => spinner
                    .progress_bar()
                    .map(|bar| live_output_callback(bar, title.clone(), 4, 3)),
                OutputMode::Quiet | OutputMode::Silent => None,
            }
        } else {
            None
        };
        let streamed = callback.is_some() && mode == OutputMode::Verbose;

        let started = Instant::now();
        match self.runner.run(spec, options, callback) {
            Ok(result) if result.success => {
                let duration = started.elapsed();
                let message = on_success(&result);
                spinner.finish_success(&format!("{} ({})", message, format_duration(duration)));
                (StepOutcome::success(step, duration), Some(result))
            }
            Ok(result) => {
                let duration = started.elapsed();
                warn!("{} exited with {:?}", command, result.exit_code);
                spinner.finish_error(&format!("{} ({})", title, format_duration(duration)));
                ui.error(&failure.render(locale));

                let output = result.combined_output();
                let hint = diagnose(&output).map(|kind| kind.hint(locale));
                let shown = if streamed { "" } else { output.as_str() };
                ui.show_error_block(&command, shown, hint.as_deref());

                (StepOutcome::failed(step, duration), Some(result))
            }
            Err(e) => {
                let duration = started.elapsed();
                warn!("{} could not be started: {}", command, e);
                spinner.finish_error(&title);
                ui.error(&failure.render(locale));
                ui.show_error_block(&command, &e.to_string(), None);
                (StepOutcome::failed(step, duration), None)
            }
        }
    }

    fn manifest_display(&self) -> String {
        self.options
            .requirements
            .strip_prefix(&self.options.project_root)
            .unwrap_or(&self.options.requirements)
            .display()
            .to_string()
    }
}

/// Skip line for a step disabled by configuration.
fn show_disabled(ui: &mut dyn UserInterface, title: &str, detail: &str) {
    let mut spinner = ui.start_spinner(title);
    spinner.finish_skipped(&format!("{} ({})", title, detail));
}
