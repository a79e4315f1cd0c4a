//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::{Result, VenvkeepError};

use super::Prompt;

fn map_dialoguer_err(e: dialoguer::Error) -> VenvkeepError {
    VenvkeepError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Ask a yes/no question.
pub fn confirm(prompt: &Prompt, term: &Term) -> Result<bool> {
    Confirm::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .default(prompt.default)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}

/// Print `message` and block until the user presses Enter.
pub fn wait_for_enter(message: &str, term: &Term) -> Result<()> {
    term.write_str(message)?;
    term.read_line()?;
    Ok(())
}
