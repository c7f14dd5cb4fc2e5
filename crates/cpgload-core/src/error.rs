//! Centralized error types for cpgload.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cpgload operations.
#[derive(Error, Debug)]
pub enum CpgLoadError {
    #[error("Command not found: {0}. Is it installed and in PATH?")]
    CommandNotFound(String),

    #[error("Command failed: {program}: {stderr}")]
    CommandFailed { program: String, stderr: String },

    #[error("No LOAD CSV clause found in script: {0}")]
    MalformedScript(String),

    #[error("Data file not found for script '{script}': {}", .path.display())]
    DataFileMissing { script: String, path: PathBuf },

    #[error("Export directory not found: {}", .0.display())]
    ExportDirNotFound(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cpgload operations.
pub type CpgLoadResult<T> = Result<T, CpgLoadError>;

impl CpgLoadError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a command-failed error.
    pub fn command_failed(program: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            program: program.into(),
            stderr: stderr.into(),
        }
    }
}
