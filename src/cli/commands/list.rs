//! List command implementation.
//!
//! The `venvkeep list` command shows the packages installed in an existing
//! environment. It never creates one.

use crate::cli::args::ListArgs;
use crate::error::{Result, VenvkeepError};
use crate::locale::Message;
use crate::maintenance::{diagnose, PipelineOptions};
use crate::python::{parse_package_list, pip, Activation};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    context: CommandContext,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(context: CommandContext, args: ListArgs) -> Self {
        Self { context, args }
    }

    /// List packages, running pip through `runner`.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        runner: &dyn CommandRunner,
    ) -> Result<CommandResult> {
        let settings = self.context.load_settings()?;
        self.context.apply_output_mode(ui, &settings);
        let locale = self.context.locale(&settings);
        let options = PipelineOptions::from_settings(&settings, &self.context.project_root, locale)?;

        let venv = options.venv();
        if !venv.is_usable() {
            let path = venv.root().display().to_string();
            let message = if venv.exists() {
                Message::VenvIncomplete { path: &path }
            } else {
                Message::VenvMissing { path: &path }
            };
            ui.error(&message.render(locale));
            return Ok(CommandResult::failure(1));
        }

        let activation = Activation::activate(&venv)?;
        let spec = pip::list_packages(&activation.venv().python());
        let command_options = activation.command_options(&options.env, &options.project_root);
        tracing::debug!("Running {}", spec);

        let result = match runner.run(&spec, &command_options, None) {
            Ok(result) => result,
            Err(VenvkeepError::CommandFailed { command, .. }) => {
                ui.error(&Message::ListFailed.render(locale));
                ui.show_error_block(&command, "", None);
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };
        activation.deactivate();

        if !result.success {
            let output = result.combined_output();
            let hint = diagnose(&output).map(|kind| kind.hint(locale));
            ui.error(&Message::ListFailed.render(locale));
            ui.show_error_block(&spec.to_string(), &output, hint.as_deref());
            return Ok(CommandResult::failure(1));
        }

        match parse_package_list(&result.stdout) {
            Ok(packages) if self.args.json => {
                let json = serde_json::to_string_pretty(&packages)
                    .map_err(|e| VenvkeepError::Other(e.into()))?;
                ui.message(&json);
            }
            Ok(packages) => {
                ui.show_block(&Table::packages(&packages).render());
                ui.success(
                    &Message::PackagesListed {
                        count: packages.len(),
                    }
                    .render(locale),
                );
            }
            Err(e) if self.args.json => return Err(e),
            Err(e) => {
                tracing::debug!("Could not parse pip list output: {}", e);
                ui.show_block(result.stdout.trim_end());
            }
        }

        Ok(CommandResult::success())
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(ui, &SystemRunner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::python::VirtualEnv;
    use crate::shell::{MockResponse, MockRunner};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const PIP_LIST: &str = r#"[{"name": "flask", "version": "3.0.3"}, {"name": "mypkg", "version": "0.1.0", "editable_project_location": "/src/mypkg"}]"#;

    fn project(with_venv: bool) -> (TempDir, CommandContext) {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("venvkeep.yml");
        fs::write(&config, "settings:\n  language: en\n").unwrap();
        if with_venv {
            let venv = VirtualEnv::new(temp.path().join("venv"));
            fs::create_dir_all(venv.scripts_dir()).unwrap();
            fs::write(venv.python(), "").unwrap();
        }
        let context = CommandContext {
            config_path: Some(config),
            ..CommandContext::new(temp.path())
        };
        (temp, context)
    }

    #[test]
    fn fails_without_environment() {
        let (temp, context) = project(false);
        let cmd = ListCommand::new(context, ListArgs::default());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &runner).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("No virtual environment"));
        assert!(runner.calls().is_empty());
        assert!(!temp.path().join("venv").exists());
    }

    #[test]
    fn renders_table() {
        let (_temp, context) = project(true);
        let cmd = ListCommand::new(context, ListArgs::default());
        let runner = MockRunner::new();
        runner.respond("pip list", MockResponse::ok(PIP_LIST));
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &runner).unwrap();

        assert!(result.success);
        assert!(ui.blocks()[0].contains("flask"));
        assert!(ui.has_success("2 package(s)"));
        let call = &runner.calls()[0];
        assert!(call.options.env.contains_key("VIRTUAL_ENV"));
    }

    #[test]
    fn json_output_round_trips_packages() {
        let (_temp, context) = project(true);
        let cmd = ListCommand::new(context, ListArgs { json: true });
        let runner = MockRunner::new();
        runner.respond("pip list", MockResponse::ok(PIP_LIST));
        let mut ui = MockUI::new();

        cmd.execute_with(&mut ui, &runner).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value[0]["name"], "flask");
        assert_eq!(value[1]["editable_project_location"], "/src/mypkg");
    }

    #[test]
    fn pip_failure_is_reported() {
        let (_temp, context) = project(true);
        let cmd = ListCommand::new(context, ListArgs::default());
        let runner = MockRunner::new();
        runner.respond("pip list", MockResponse::fail(1, "No module named pip"));
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &runner).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_hint("--recreate"));
    }
}
