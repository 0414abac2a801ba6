//! Notification transport.
//!
//! The core only produces a subject and a plain text body. Delivery is up to
//! a `Notifier`; the bundled one hands the message to an external command
//! (for example a mail relay script) as its last two arguments. No retries.

use std::process::Command;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{Error, Result};

pub trait Notifier {
    fn send(&self, subject: &str, body: &str) -> Result<()>;
}

/// Runs `program args.. <subject> <body>`; success is a zero exit status.
pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    /// Builds a notifier from an argv prefix. `None` for an empty argv.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(CommandNotifier {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Notifier for CommandNotifier {
    fn send(&self, subject: &str, body: &str) -> Result<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(subject)
            .arg(body)
            .output()
            .map_err(|e| Error::Notify(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Notify(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        info!(program = %self.program, subject, "notification sent");
        Ok(())
    }
}

/// Subject line for a run summary sent on `date`.
pub fn summary_subject(date: NaiveDate) -> String {
    format!("Follower report {date}")
}
