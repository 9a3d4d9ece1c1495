use crate::services::session_service::{Confirmation, Navigator};
use std::io::{self, BufRead, Write};

/// "Navigates" by telling the user how to sign in again.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn to_login(&self, login_url: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "请先登录: classifier-console login --username <用户名> ({login_url})");
    }
}

/// Asks on stderr and reads the answer from stdin. Anything but `y`/`yes` declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, question: &str) -> bool {
        {
            let mut stderr = io::stderr().lock();
            let _ = write!(stderr, "{question} [y/N] ");
            let _ = stderr.flush();
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

/// Confirms everything; for `--yes` and scripted use.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!(question, "Confirmation assumed");
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
