//! Scripted command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] and records every command it is
//! asked to run. Responses are matched by substring against the command's
//! display form; the first matching rule wins.
//!
//! # Example
//!
//! ```
//! use venvkeep::shell::{CommandOptions, CommandRunner, MockResponse, MockRunner, ProcessSpec};
//!
//! let runner = MockRunner::new();
//! runner.respond("--version", MockResponse::ok("Python 3.12.1"));
//! runner.respond("pip install", MockResponse::fail(1, "ERROR: no network"));
//!
//! let spec = ProcessSpec::new("python").arg("--version");
//! let result = runner.run(&spec, &CommandOptions::default(), None).unwrap();
//! assert_eq!(result.stdout.trim(), "Python 3.12.1");
//! assert_eq!(runner.calls().len(), 1);
//! ```

use std::cell::RefCell;
use std::time::Duration;

use crate::error::{Result, VenvkeepError};

use super::command::{CommandOptions, CommandResult, OutputCallback, OutputLine, ProcessSpec};
use super::runner::CommandRunner;

/// A canned response for a matched command.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Exit 0 with the given stdout.
    Success { stdout: String },
    /// Exit with `code`, writing `stderr`.
    Failure { code: i32, stderr: String },
    /// The program could not be spawned at all.
    SpawnError,
}

impl MockResponse {
    /// Successful response with stdout.
    pub fn ok(stdout: &str) -> Self {
        Self::Success {
            stdout: stdout.to_string(),
        }
    }

    /// Failing response with an exit code and stderr.
    pub fn fail(code: i32, stderr: &str) -> Self {
        Self::Failure {
            code,
            stderr: stderr.to_string(),
        }
    }
}

type SideEffect = Box<dyn Fn(&ProcessSpec)>;

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// The command that was requested.
    pub spec: ProcessSpec,
    /// Environment overlay passed with it.
    pub options: CommandOptions,
}

/// Command runner that returns scripted results.
#[derive(Default)]
pub struct MockRunner {
    rules: RefCell<Vec<(String, MockResponse)>>,
    effects: RefCell<Vec<(String, SideEffect)>>,
    calls: RefCell<Vec<MockCall>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to commands containing `pattern` with `response`.
    pub fn respond(&self, pattern: &str, response: MockResponse) {
        self.rules
            .borrow_mut()
            .push((pattern.to_string(), response));
    }

    /// Run `effect` whenever a command containing `pattern` is executed.
    ///
    /// Effects run before the response is produced, which lets tests emulate
    /// commands that create files (such as `python -m venv`).
    pub fn on_run<F>(&self, pattern: &str, effect: F)
    where
        F: Fn(&ProcessSpec) + 'static,
    {
        self.effects
            .borrow_mut()
            .push((pattern.to_string(), Box::new(effect)));
    }

    /// All recorded invocations, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }

    /// Display forms of all recorded invocations.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.spec.to_string())
            .collect()
    }

    /// Whether any recorded command contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.commands().iter().any(|c| c.contains(pattern))
    }

    fn response_for(&self, display: &str) -> MockResponse {
        self.rules
            .borrow()
            .iter()
            .find(|(pattern, _)| display.contains(pattern.as_str()))
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| MockResponse::ok(""))
    }
}

impl CommandRunner for MockRunner {
    fn run(
        &self,
        spec: &ProcessSpec,
        options: &CommandOptions,
        output: Option<OutputCallback>,
    ) -> Result<CommandResult> {
        let display = spec.to_string();
        self.calls.borrow_mut().push(MockCall {
            spec: spec.clone(),
            options: options.clone(),
        });

        for (pattern, effect) in self.effects.borrow().iter() {
            if display.contains(pattern.as_str()) {
                effect(spec);
            }
        }

        match self.response_for(&display) {
            MockResponse::Success { stdout } => {
                if let Some(callback) = output {
                    for line in stdout.lines() {
                        callback(OutputLine::Stdout(line.to_string()));
                    }
                }
                Ok(CommandResult::success(
                    stdout,
                    String::new(),
                    Duration::from_millis(1),
                ))
            }
            MockResponse::Failure { code, stderr } => {
                if let Some(callback) = output {
                    for line in stderr.lines() {
                        callback(OutputLine::Stderr(line.to_string()));
                    }
                }
                Ok(CommandResult::failure(
                    Some(code),
                    String::new(),
                    stderr,
                    Duration::from_millis(1),
                ))
            }
            MockResponse::SpawnError => Err(VenvkeepError::CommandFailed {
                command: display,
                code: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn unmatched_commands_succeed() {
        let runner = MockRunner::new();
        let result = runner
            .run(&ProcessSpec::new("anything"), &CommandOptions::default(), None)
            .unwrap();
        assert!(result.success);
        assert!(runner.ran("anything"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let runner = MockRunner::new();
        runner.respond("pip install", MockResponse::fail(2, "boom"));
        runner.respond("pip", MockResponse::ok("fine"));

        let install = ProcessSpec::new("python").args(["-m", "pip", "install", "x"]);
        let list = ProcessSpec::new("python").args(["-m", "pip", "list"]);

        let r1 = runner.run(&install, &CommandOptions::default(), None).unwrap();
        let r2 = runner.run(&list, &CommandOptions::default(), None).unwrap();

        assert_eq!(r1.exit_code, Some(2));
        assert_eq!(r1.stderr, "boom");
        assert!(r2.success);
        assert_eq!(r2.stdout, "fine");
    }

    #[test]
    fn spawn_error_is_command_failed() {
        let runner = MockRunner::new();
        runner.respond("python3", MockResponse::SpawnError);

        let err = runner
            .run(
                &ProcessSpec::new("python3").arg("--version"),
                &CommandOptions::default(),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, VenvkeepError::CommandFailed { code: None, .. }));
    }

    #[test]
    fn side_effects_run_on_match() {
        let runner = MockRunner::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let hits_clone = Rc::clone(&hits);
        runner.on_run("-m venv", move |spec| {
            hits_clone.borrow_mut().push(spec.args.clone());
        });

        let venv = ProcessSpec::new("python").args(["-m", "venv", "env"]);
        runner.run(&venv, &CommandOptions::default(), None).unwrap();
        runner
            .run(&ProcessSpec::new("python"), &CommandOptions::default(), None)
            .unwrap();

        assert_eq!(hits.borrow().len(), 1);
        assert_eq!(hits.borrow()[0], vec!["-m", "venv", "env"]);
    }

    #[test]
    fn streams_scripted_output_to_callback() {
        use std::sync::{Arc, Mutex};

        let runner = MockRunner::new();
        runner.respond("list", MockResponse::ok("a\nb"));

        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);
        let callback: OutputCallback = Box::new(move |line| {
            if let OutputLine::Stdout(s) = line {
                lines_clone.lock().unwrap().push(s);
            }
        });

        runner
            .run(
                &ProcessSpec::new("pip").arg("list"),
                &CommandOptions::default(),
                Some(callback),
            )
            .unwrap();

        assert_eq!(*lines.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn records_environment_overlay() {
        let runner = MockRunner::new();
        let mut options = CommandOptions::default();
        options
            .env
            .insert("VIRTUAL_ENV".to_string(), "/tmp/venv".to_string());

        runner
            .run(&ProcessSpec::new("python"), &options, None)
            .unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls[0].options.env.get("VIRTUAL_ENV").map(String::as_str),
            Some("/tmp/venv")
        );
    }
}
