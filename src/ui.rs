use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};
use crate::remove::Confirm;
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use std::io::{BufRead, IsTerminal, Write};
use tracing_subscriber::EnvFilter;

pub(crate) fn progress(message: &str) {
    eprintln!("==> {message}");
}

pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Confirms on the controlling terminal, or reads a `y`/`yes` answer from
/// stdin when it is not a terminal.
#[derive(Debug, Default)]
pub(crate) struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() {
            return dialoguer::Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
                .context("failed to read confirmation");
        }

        eprint!("{prompt} [y/N] ");
        std::io::stderr().flush().context("failed to flush stderr")?;
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read confirmation from stdin")?;
        Ok(is_affirmative(&line))
    }
}

pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
