//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, VenvkeepError};

use super::{
    format_duration, parse_yes_no, OutputMode, Prompt, RunSummary, SpinnerHandle, StatusKind,
    UserInterface,
};

const PROMPT_ENV_PREFIX: &str = "VENVKEEP_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Output is plain text with bracketed status labels so it reads well in
/// CI logs. Prompts are answered from `VENVKEEP_PROMPT_<KEY>` variables or
/// their defaults.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", StatusKind::Success.format_plain(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", StatusKind::Warning.format_plain(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", StatusKind::Failed.format_plain(msg));
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        match self.env_overrides.get(&env_key) {
            Some(value) => parse_yes_no(value).ok_or_else(|| VenvkeepError::ConfigValidationError {
                message: format!("{} must be yes or no, got '{}'", env_key, value),
            }),
            None => Ok(prompt.default),
        }
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(PlainSpinner {
            visible: self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_step(&mut self, index: usize, total: usize, title: &str) {
        if self.mode.shows_details() {
            println!("[{}/{}] {}", index, total, title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_details() {
            println!("  Hint: {}", hint);
        }
    }

    fn show_block(&mut self, text: &str) {
        if self.mode.shows_details() {
            for line in text.lines() {
                println!("    {}", line);
            }
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        eprintln!();
        eprintln!("    ┌─ Command ──────────────────────────");
        eprintln!("    │ {}", command);
        if !output.is_empty() {
            eprintln!("    ├─ Output ───────────────────────────");
            for line in output.lines() {
                eprintln!("    │ {}", line);
            }
        }
        eprintln!("    └────────────────────────────────────");
        if let Some(h) = hint {
            eprintln!();
            eprintln!("    Hint: {}", h);
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            if !summary.success {
                self.error(&summary.headline);
            }
            return;
        }

        println!();
        println!("  ┌─ Summary ──────────────────────────");

        for step in &summary.step_results {
            let right_side = match (&step.duration, &step.detail) {
                (Some(d), _) => format_duration(*d),
                (None, Some(detail)) => detail.clone(),
                (None, None) => String::new(),
            };
            println!(
                "  │ {:<9} {:<32} {}",
                step.status.bracketed(),
                step.name,
                right_side
            );
        }

        println!("  ├────────────────────────────────────");
        println!(
            "  │ Total: {} · {} run · {} skipped",
            format_duration(summary.total_duration),
            summary.steps_run,
            summary.steps_skipped,
        );
        println!("  └────────────────────────────────────");

        if summary.success {
            println!("{}", StatusKind::Success.format_plain(&summary.headline));
        } else {
            eprintln!(
                "{}",
                StatusKind::Failed.format_plain(&format!(
                    "{}: {}",
                    summary.headline,
                    summary.failed_steps.join(", ")
                ))
            );
        }
    }

    fn pause(&mut self, _message: &str) -> Result<()> {
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints only the final line.
struct PlainSpinner {
    visible: bool,
}

impl SpinnerHandle for PlainSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.visible {
            println!("{}", StatusKind::Success.format_plain(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", StatusKind::Failed.format_plain(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.visible {
            println!("{}", StatusKind::Skipped.format_plain(msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recreate_prompt(default: bool) -> Prompt {
        Prompt {
            key: "recreate".to_string(),
            question: "Recreate?".to_string(),
            default,
        }
    }

    #[test]
    fn is_never_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn confirm_uses_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        assert!(!ui.confirm(&recreate_prompt(false)).unwrap());
        assert!(ui.confirm(&recreate_prompt(true)).unwrap());
    }

    #[test]
    fn confirm_uses_env_override() {
        let mut overrides = HashMap::new();
        overrides.insert("VENVKEEP_PROMPT_RECREATE".to_string(), "yes".to_string());

        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, overrides);
        assert!(ui.confirm(&recreate_prompt(false)).unwrap());
    }

    #[test]
    fn confirm_rejects_garbage_override() {
        let mut overrides = HashMap::new();
        overrides.insert("VENVKEEP_PROMPT_RECREATE".to_string(), "perhaps".to_string());

        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, overrides);
        assert!(ui.confirm(&recreate_prompt(false)).is_err());
    }

    #[test]
    fn pause_returns_immediately() {
        let mut ui = NonInteractiveUI::new(OutputMode::Normal);
        ui.pause("Press Enter").unwrap();
    }

    #[test]
    fn plain_spinner_finishes() {
        let mut spinner = PlainSpinner { visible: false };
        spinner.set_message("ignored");
        spinner.finish_success("done");
        spinner.finish_skipped("skipped");
    }
}
