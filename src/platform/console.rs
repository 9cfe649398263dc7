//! Colored terminal rendering of status events

use crate::core::controller::RunResult;
use crate::core::report::{ReportSink, StatusEvent};
use colored::Colorize;

/// Prints every event as one colored line on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    /// Hide the per-attempt debug lines
    pub quiet: bool,
}

impl ConsoleSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Text for one event, or `None` when the event is filtered out
    pub fn render(&self, event: &StatusEvent) -> Option<String> {
        let line = match event {
            StatusEvent::Debug(message) => {
                if self.quiet {
                    return None;
                }
                format!("{} {}", "[DEBUG]".cyan(), message)
            }
            StatusEvent::Success {
                username,
                password,
                simulated,
            } => {
                let tag = if *simulated {
                    "[SIMULATED SUCCESS]"
                } else {
                    "[SUCCESS]"
                };
                format!(
                    "{} Logged in with {}",
                    tag.green().bold(),
                    format!("{username}:{password}").cyan()
                )
            }
            StatusEvent::Failed {
                username,
                password,
                reason,
            } => format!("{} {username}:{password} - {reason}", "[FAILED]".red()),
            StatusEvent::TempError { code, reason } => {
                format!("{} {code} {reason}", "[TEMP ERROR]".yellow())
            }
            StatusEvent::Timeout {
                attempt,
                max_attempts,
            } => format!(
                "{} Connection timed out (attempt {attempt}/{max_attempts})",
                "[TIMEOUT]".yellow()
            ),
            StatusEvent::ConnectionFailure { target, reason } => format!(
                "{} Could not connect to FTP server at {target}\nReason: {reason}",
                "[FAILURE]".red().bold()
            ),
            StatusEvent::Warning(message) => format!("{} {message}", "[WARNING]".yellow().bold()),
            StatusEvent::Info(message) => format!("{} {message}", "[INFO]".yellow().bold()),
            StatusEvent::Error(message) => format!("{} {message}", "[ERROR]".red().bold()),
            StatusEvent::ProgressTick {
                index,
                total,
                current,
            } => format!(
                "{} Trying password: {}",
                format!("[Attempt {} of {}]", index + 1, total).blue().bold(),
                current.cyan()
            ),
            StatusEvent::Finished { result } => match result {
                RunResult::Found { credentials } => format!(
                    "\n{}\n{} {}\n",
                    "Login Successful".green().bold(),
                    "-> Credentials:".green().bold(),
                    format!(
                        "{}:{}",
                        credentials.username(),
                        credentials.password().as_str()
                    )
                    .cyan()
                ),
                RunResult::Exhausted => {
                    format!("\n{}\n", "No valid FTP credentials found.".red().bold())
                }
                RunResult::Cancelled { attempted } => format!(
                    "\n{}\n",
                    format!("Cancelled after {attempted} attempts. No valid FTP credentials found.")
                        .red()
                        .bold()
                ),
            },
        };
        Some(line)
    }
}

impl ReportSink for ConsoleSink {
    fn emit(&self, event: StatusEvent) {
        if let Some(line) = self.render(&event) {
            println!("{line}");
        }
    }
}
