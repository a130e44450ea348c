use std::future::Future;

use agenda_core::dialog::{ConfirmDialog, Confirmation};
use agenda_core::{AgendaError, AgendaResult};
use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Run `fut` behind a spinner, clearing it whatever the outcome.
pub async fn with_spinner<T, F>(message: impl Into<String>, fut: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = create_spinner(message);
    let out = fut.await;
    spinner.finish_and_clear();
    out
}

/// Yes/no prompt on the terminal, defaulting to no.
pub struct TerminalConfirm;

impl ConfirmDialog for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> AgendaResult<Confirmation> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map(Confirmation::from)
            .map_err(|e| AgendaError::Io(std::io::Error::other(e.to_string())))
    }
}
