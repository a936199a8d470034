//! Error handling for the eject step
//!
//! Every fatal outcome of the step is a [`StepError`]. Each variant carries a
//! stable code and recovery guidance, mirroring how the step reports failures
//! to the pipeline log.

use crate::security::CommandError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for step operations
pub type Result<T> = std::result::Result<T, StepError>;

/// Hint printed after every fatal failure
pub const VERBOSE_HINT: &str =
    "For more details you can enable the debug logs by turning on the verbose step input.";

/// Main error type for the eject step
#[derive(Error, Debug)]
pub enum StepError {
    /// Bad, missing or inconsistent input
    #[error("Input validation error: {message}")]
    Configuration { message: String },

    /// A child process could not be launched or exited non-zero
    #[error("Failed to {operation}: {source}")]
    ExternalTool {
        operation: String,
        #[source]
        source: CommandError,
    },

    /// Filesystem access failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is missing, unreadable or not the expected JSON shape
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl StepError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn external_tool(operation: impl Into<String>, source: CommandError) -> Self {
        Self::ExternalTool {
            operation: operation.into(),
            source,
        }
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::Configuration { .. } => vec![
                "Provide both user_name and password, or neither",
                "Check that the workdir input points to an existing directory",
            ],
            Self::ExternalTool { .. } => vec![
                "Check the command output above",
                "Make sure node and npm are installed on the build machine",
            ],
            Self::Io { .. } => vec!["Check file permissions in the project directory"],
            Self::Parse { .. } => vec![
                "Make sure package.json exists in the workdir",
                "Make sure package.json has a \"dependencies\" object",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::ExternalTool { .. } => "EXTERNAL_TOOL_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
        }
    }
}
