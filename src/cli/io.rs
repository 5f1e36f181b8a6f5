use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::cli::core::CommandError;

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Prompt for text pre-filled with `initial`. A blank answer yields `None`.
pub fn prompt_prefilled(
    theme: &ColorfulTheme,
    prompt: &str,
    initial: &str,
) -> Result<Option<String>, CommandError> {
    let answer = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(CommandError::from)?;
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
