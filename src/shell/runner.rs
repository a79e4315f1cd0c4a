//! Command runner abstraction.
//!
//! The maintenance pipeline never spawns processes directly; it goes through
//! a [`CommandRunner`] so that dry runs and tests can substitute their own
//! behavior.

use std::time::Duration;

use crate::error::Result;

use super::command::{
    execute, execute_streaming, CommandOptions, CommandResult, OutputCallback, ProcessSpec,
};

/// Trait for running external commands.
pub trait CommandRunner {
    /// Run a command to completion.
    ///
    /// When `output` is given, lines are forwarded to it as they are produced.
    /// Output is always captured into the returned [`CommandResult`].
    fn run(
        &self,
        spec: &ProcessSpec,
        options: &CommandOptions,
        output: Option<OutputCallback>,
    ) -> Result<CommandResult>;

    /// Whether this runner actually executes anything.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        spec: &ProcessSpec,
        options: &CommandOptions,
        output: Option<OutputCallback>,
    ) -> Result<CommandResult> {
        match output {
            Some(callback) => execute_streaming(spec, options, callback),
            None => {
                let options = CommandOptions {
                    capture_stdout: true,
                    capture_stderr: true,
                    ..options.clone()
                };
                execute(spec, &options)
            }
        }
    }
}

/// Pretends every command succeeded without running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(
        &self,
        spec: &ProcessSpec,
        _options: &CommandOptions,
        _output: Option<OutputCallback>,
    ) -> Result<CommandResult> {
        tracing::debug!("dry-run: skipping {}", spec);
        Ok(CommandResult::success(
            String::new(),
            String::new(),
            Duration::ZERO,
        ))
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(body: &str) -> ProcessSpec {
        if cfg!(target_os = "windows") {
            ProcessSpec::new("cmd").args(["/C", body])
        } else {
            ProcessSpec::new("sh").args(["-c", body])
        }
    }

    #[test]
    fn system_runner_captures_without_callback() {
        let result = SystemRunner
            .run(&script("echo captured"), &CommandOptions::default(), None)
            .unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("captured"));
    }

    #[test]
    fn system_runner_streams_with_callback() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(0usize));
        let seen_clone = Arc::clone(&seen);
        let callback: OutputCallback = Box::new(move |_| {
            *seen_clone.lock().unwrap() += 1;
        });

        let result = SystemRunner
            .run(
                &script("echo a && echo b"),
                &CommandOptions::default(),
                Some(callback),
            )
            .unwrap();

        assert!(result.success);
        assert!(*seen.lock().unwrap() >= 2);
    }

    #[test]
    fn system_runner_is_not_dry_run() {
        assert!(!SystemRunner.is_dry_run());
    }

    #[test]
    fn dry_run_runner_never_executes() {
        let result = DryRunRunner
            .run(
                &ProcessSpec::new("/definitely/not/a/real/program"),
                &CommandOptions::default(),
                None,
            )
            .unwrap();
        assert!(result.success);
        assert!(result.stdout.is_empty());
        assert!(DryRunRunner.is_dry_run());
    }
}
