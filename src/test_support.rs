//! Command runner fake shared by unit tests

use crate::security::{CommandError, CommandRunner, Invocation};
use std::path::PathBuf;

#[derive(Debug)]
pub(crate) struct RecordedCommand {
    pub line: String,
    pub workdir: Option<PathBuf>,
}

/// Records each invocation instead of spawning it
///
/// Commands whose first argument is listed in `failing` return a non-zero
/// exit, and those listed in `panicking` panic after being recorded.
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub commands: Vec<RecordedCommand>,
    failing: Vec<String>,
    panicking: Vec<String>,
}

impl RecordingRunner {
    pub fn failing_on(subcommands: &[&str]) -> Self {
        Self {
            failing: subcommands.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn panicking_on(subcommands: &[&str]) -> Self {
        Self {
            panicking: subcommands.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.line.as_str()).collect()
    }

    /// Whether a command with this first argument was run
    pub fn ran(&self, subcommand: &str) -> bool {
        self.commands
            .iter()
            .any(|c| c.line.split(' ').nth(1) == Some(subcommand))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), CommandError> {
        let line = invocation.printable();
        let subcommand = line.split(' ').nth(1).unwrap_or_default().to_string();
        self.commands.push(RecordedCommand {
            line,
            workdir: invocation.workdir().map(PathBuf::from),
        });

        if self.panicking.contains(&subcommand) {
            panic!("injected panic in {}", subcommand);
        }
        if self.failing.contains(&subcommand) {
            return Err(CommandError::Failed {
                program: invocation.program().to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }
}
