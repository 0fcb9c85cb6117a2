//! Shared CLI error type and exit codes.

use crate::config::Config;
use crate::engine::EngineError;
use crate::parser::CommandError;
use std::fmt;
use std::path::Path;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad command, arguments or configuration
    Validation = 1,
    /// Missing, unreadable or unwritable files
    Io = 2,
    /// Rendering or template recovery failed
    Render = 3,
}

impl ExitCode {
    /// Numeric process exit code.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code the process should terminate with
    pub code: ExitCode,
    /// Human-readable message
    pub message: String,
}

/// Result type of command handlers.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// A validation error (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// An I/O error (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }

    /// A render error (exit code 3).
    pub fn render(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Render,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<EngineError> for CliError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::MissingResource { .. } | EngineError::InvalidData { .. } => {
                Self::io(error.to_string())
            }
            _ => Self::render(error.to_string()),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(error: CommandError) -> Self {
        Self::validation(error.to_string())
    }
}

/// Loads configuration, reporting any failure as a validation error.
pub fn load_config(explicit: Option<&Path>) -> CliResult<Config> {
    Config::load(explicit).map_err(|e| CliError::validation(format!("{e:#}")))
}
