//! Run command implementation.
//!
//! The `venvkeep run` command (also the default) executes the maintenance
//! pipeline, prints the summary, and optionally waits for Enter.

use crate::cli::args::RunArgs;
use crate::config::{PauseMode, Settings};
use crate::error::Result;
use crate::locale::{Locale, Message};
use crate::maintenance::{Pipeline, PipelineOptions, RunReport};
use crate::shell::{is_ci, CommandRunner, DryRunRunner, SystemRunner};
use crate::ui::{hints, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    context: CommandContext,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(context: CommandContext, args: RunArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Apply command-line overrides on top of configuration.
    fn apply_args(&self, settings: &mut Settings) {
        if let Some(venv) = &self.args.venv {
            settings.venv_dir = venv.clone();
        }
        if let Some(requirements) = &self.args.requirements {
            settings.requirements = requirements.clone();
        }
        if let Some(python) = &self.args.python {
            settings.python = Some(python.clone());
        }
        if self.args.skip_pip_upgrade {
            settings.upgrade_pip = false;
        }
        if self.args.no_list {
            settings.list_packages = false;
        }
    }

    fn build_options(&self, settings: &Settings, locale: Locale) -> Result<PipelineOptions> {
        let mut options =
            PipelineOptions::from_settings(settings, &self.context.project_root, locale)?;
        options.recreate = self.args.recreate;
        Ok(options)
    }

    /// Whether to wait for Enter before exiting.
    fn should_pause(&self, mode: PauseMode, interactive: bool) -> bool {
        if self.args.no_pause || !interactive {
            return false;
        }
        if self.args.pause {
            return true;
        }
        match mode {
            PauseMode::Never => false,
            PauseMode::Always => true,
            PauseMode::Auto => !is_ci(),
        }
    }

    /// Run the pipeline with explicit runners.
    pub fn run_with(
        &self,
        ui: &mut dyn UserInterface,
        runner: &dyn CommandRunner,
        probe_runner: &dyn CommandRunner,
    ) -> Result<CommandResult> {
        let mut settings = self.context.load_settings()?;
        self.apply_args(&mut settings);
        self.context.apply_output_mode(ui, &settings);
        let locale = self.context.locale(&settings);

        let options = self.build_options(&settings, locale)?;
        let report = Pipeline::new(options, runner)
            .with_probe_runner(probe_runner)
            .run(ui);

        self.report(ui, &report, locale);

        if self.should_pause(settings.pause, ui.is_interactive()) {
            ui.pause(&Message::PressEnter.render(locale))?;
        }

        Ok(if report.success() {
            CommandResult::success()
        } else {
            CommandResult::failure(report.exit_code())
        })
    }

    fn report(&self, ui: &mut dyn UserInterface, report: &RunReport, locale: Locale) {
        ui.show_run_summary(&report.summary(locale));

        let hint = if report.dry_run {
            hints::after_dry_run(locale)
        } else if report.success() {
            hints::after_successful_run(locale)
        } else {
            hints::after_failed_run(locale)
        };
        ui.show_hint(hint);
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.dry_run {
            self.run_with(ui, &DryRunRunner, &SystemRunner)
        } else {
            self.run_with(ui, &SystemRunner, &SystemRunner)
        }
    }
}
