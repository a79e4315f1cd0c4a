//! Interactive terminal UI.

use console::Term;
use std::io::{IsTerminal, Write};

use crate::error::Result;

use super::prompts::{confirm, wait_for_enter};
use super::{
    format_duration, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt, RunSummary,
    SpinnerHandle, StatusKind, Theme, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: Theme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: Theme::detect(),
            mode,
        }
    }

    fn border_line(&mut self, corner: &str, label: Option<&str>) {
        let b = &self.theme.border;
        let text = match label {
            Some(label) => format!("{} {} {}", corner, label, "─".repeat(30)),
            None => format!("{}{}", corner, "─".repeat(36)),
        };
        writeln!(self.term, "  {}", b.apply_to(text)).ok();
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        confirm(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(QuietSpinner {
                theme: self.theme.clone(),
                visible: self.mode.shows_status(),
            })
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_step(&mut self, index: usize, total: usize, title: &str) {
        if self.mode.shows_details() {
            writeln!(self.term, "{}", self.theme.format_step(index, total, title)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_details() {
            writeln!(self.term, "  {}", self.theme.hint.apply_to(hint)).ok();
        }
    }

    fn show_block(&mut self, text: &str) {
        if self.mode.shows_details() {
            for line in text.lines() {
                writeln!(self.term, "    {}", line).ok();
            }
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        let b = &self.theme.border;
        eprintln!(
            "    {} {}",
            b.apply_to("┌─"),
            b.apply_to("Command ──────────────────────────")
        );
        eprintln!("    {} {}", b.apply_to("│"), self.theme.command.apply_to(command));

        if !output.is_empty() {
            eprintln!(
                "    {} {}",
                b.apply_to("├─"),
                b.apply_to("Output ───────────────────────────")
            );
            for line in output.lines() {
                eprintln!("    {} {}", b.apply_to("│"), line);
            }
        }

        eprintln!("    {}", b.apply_to("└────────────────────────────────────"));

        if let Some(h) = hint {
            eprintln!();
            eprintln!(
                "    {} {}",
                self.theme.hint.apply_to("Hint:"),
                self.theme.hint.apply_to(h)
            );
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            if !summary.success {
                self.error(&summary.headline);
            }
            return;
        }

        writeln!(self.term).ok();
        self.border_line("┌─", Some("Summary"));

        for step in &summary.step_results {
            let icon = step.status.styled(&self.theme);
            let right_side = match (&step.duration, &step.detail) {
                (Some(d), _) => self.theme.duration.apply_to(format_duration(*d)).to_string(),
                (None, Some(detail)) => self.theme.dim.apply_to(detail).to_string(),
                (None, None) => String::new(),
            };
            writeln!(
                self.term,
                "  {} {} {:<32} {}",
                self.theme.border.apply_to("│"),
                icon,
                step.name,
                right_side,
            )
            .ok();
        }

        self.border_line("├", None);
        writeln!(
            self.term,
            "  {} Total: {} {} {} run {} {} skipped",
            self.theme.border.apply_to("│"),
            self.theme
                .duration
                .apply_to(format_duration(summary.total_duration)),
            self.theme.dim.apply_to("·"),
            summary.steps_run,
            self.theme.dim.apply_to("·"),
            summary.steps_skipped,
        )
        .ok();
        self.border_line("└", None);

        if summary.success {
            writeln!(self.term, "  {}", self.theme.format_success(&summary.headline)).ok();
        } else {
            eprintln!(
                "  {}",
                self.theme.format_error(&format!(
                    "{}: {}",
                    summary.headline,
                    summary.failed_steps.join(", ")
                ))
            );
        }
    }

    fn pause(&mut self, message: &str) -> Result<()> {
        writeln!(self.term).ok();
        wait_for_enter(message, &self.term)
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term() && std::io::stdin().is_terminal()
    }
}

/// Spinner stand-in for quiet mode: prints only the final line.
struct QuietSpinner {
    theme: Theme,
    visible: bool,
}

impl SpinnerHandle for QuietSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.visible {
            println!("{}", StatusKind::Success.format(&self.theme, msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", StatusKind::Failed.format(&self.theme, msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.visible {
            println!("{}", StatusKind::Skipped.format(&self.theme, msg));
        }
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
