use dialoguer::{Confirm, theme::ColorfulTheme};
use tracing::warn;

use crate::application::moderation::Confirmation;

/// Asks on the terminal. Anything other than an explicit "yes", including a
/// missing terminal, counts as declining.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        match Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!(
                    target = "presentation::prompt",
                    error = %err,
                    "confirmation prompt unavailable; treating as declined"
                );
                false
            }
        }
    }
}

/// Used for `--yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
