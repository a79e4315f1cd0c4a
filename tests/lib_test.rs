//! Library integration tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use venvkeep::config::Settings;
use venvkeep::locale::{Locale, Message};
use venvkeep::maintenance::{
    diagnose, FailureKind, MaintenanceStep, Pipeline, PipelineOptions, StepStatus,
};
use venvkeep::python::{Manifest, PythonVersion, VirtualEnv};
use venvkeep::shell::{MockResponse, MockRunner};
use venvkeep::ui::MockUI;
use venvkeep::VenvkeepError;

#[test]
fn error_types_are_public() {
    let err = VenvkeepError::ConfigValidationError {
        message: "settings.venv_dir: must not be empty".into(),
    };
    assert!(err.is_config_error());
    assert!(err.to_string().contains("venv_dir"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> venvkeep::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use venvkeep::cli::{Cli, Commands};

    let cli = Cli::parse_from(["venvkeep", "run", "--recreate", "--no-pause"]);
    match cli.command {
        Some(Commands::Run(args)) => {
            assert!(args.recreate);
            assert!(args.no_pause);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn messages_are_localized() {
    assert_eq!(Message::Completed.render(Locale::English), "Maintenance complete");
    assert_eq!(
        Message::Completed.render(Locale::Japanese),
        "メンテナンスが完了しました"
    );
}

#[test]
fn manifest_counts_requirements() {
    let manifest = Manifest::parse(
        &PathBuf::from("requirements.txt"),
        "# pinned\nrequests==2.32.3\n\n-r dev.txt\nflask>=3\n",
    );
    assert_eq!(manifest.requirement_count(), 2);
}

#[test]
fn version_output_is_parsed() {
    let version = PythonVersion::from_version_output("Python 3.12.1\n").unwrap();
    assert!(version.satisfies(&PythonVersion::new(3, 8, 0)));
    assert_eq!(version.to_string(), "3.12.1");
}

#[test]
fn pip_failures_are_diagnosed() {
    let output = "ERROR: No matching distribution found for nonexistent-pkg";
    assert!(matches!(
        diagnose(output),
        Some(FailureKind::NoMatchingDistribution { .. })
    ));
    assert!(diagnose("Successfully installed requests").is_none());
}

fn options(temp: &TempDir) -> PipelineOptions {
    let mut options =
        PipelineOptions::from_settings(&Settings::default(), temp.path(), Locale::English)
            .unwrap();
    let python = temp.path().join("python3");
    fs::write(&python, "").unwrap();
    options.python = Some(python);
    options
}

fn runner() -> MockRunner {
    let runner = MockRunner::new();
    runner.respond("--version", MockResponse::ok("Python 3.11.4"));
    runner.respond("pip list", MockResponse::ok("[]"));
    runner.on_run("-m venv", |spec| {
        let venv = VirtualEnv::new(PathBuf::from(spec.args.last().unwrap()));
        fs::create_dir_all(venv.scripts_dir()).unwrap();
        fs::write(venv.python(), "").unwrap();
    });
    runner
}

#[test]
fn pipeline_runs_every_step() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("requirements.txt"), "requests\n").unwrap();
    let runner = runner();
    let mut ui = MockUI::new();

    let report = Pipeline::new(options(&temp), &runner)
        .with_search_path(Vec::new())
        .run(&mut ui);

    assert!(report.success());
    assert_eq!(report.exit_code(), 0);
    for step in MaintenanceStep::ALL {
        assert_eq!(report.status(step), Some(StepStatus::Success), "{}", step);
    }
    assert!(temp.path().join("venv").is_dir());
}

#[test]
fn pipeline_without_interpreter_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let mut options = options(&temp);
    options.python = None;
    let runner = runner();
    let mut ui = MockUI::new();

    let report = Pipeline::new(options, &runner)
        .with_search_path(Vec::new())
        .run(&mut ui);

    assert!(!report.success());
    assert_eq!(
        report.status(MaintenanceStep::CheckInterpreter),
        Some(StepStatus::Failed)
    );
    assert_eq!(
        report.status(MaintenanceStep::EnsureVenv),
        Some(StepStatus::Blocked)
    );
    assert!(!temp.path().join("venv").exists());
    assert!(runner.calls().is_empty());
}
