//! Console questions asked on the operator's behalf.
//!
//! Every prompt suspends the spinner first so the question is not overdrawn.

use std::io;

use console::Term;
use macwalk_core::retry::Prompter;
use tracing_indicatif::suspend_tracing_indicatif;

/// Answers core-switch retries from the keyboard.
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn retry_unreachable(&self, host: &str) -> bool {
        suspend_tracing_indicatif(|| confirm(&format!("{host} is unavailable. Retry? [y/N] ")))
    }

    fn fresh_password(&self, host: &str, username: &str) -> Option<String> {
        suspend_tracing_indicatif(|| read_password(&format!("Password for {username}@{host}: ")))
            .ok()
            .filter(|password| !password.is_empty())
    }
}

pub fn confirm(question: &str) -> bool {
    let term = Term::stderr();
    if term.write_str(question).is_err() {
        return false;
    }
    term.read_line()
        .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false)
}

pub fn read_password(prompt: &str) -> io::Result<String> {
    let term = Term::stderr();
    term.write_str(prompt)?;
    term.read_secure_line()
}

pub fn read_line(prompt: &str) -> io::Result<String> {
    let term = Term::stdout();
    term.write_str(prompt)?;
    Ok(term.read_line()?.trim().to_string())
}
