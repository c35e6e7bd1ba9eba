use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the pruned manifest was produced
    Success = 0,
    /// Application error (parse error, resolution error, file I/O error, etc.)
    ApplicationError = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ApplicationError => write!(f, "Application Error (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
        }
    }
}

/// Application-specific errors for dependency pruning.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum PruneError {
    #[error("Dependency manifest not found: {path}\n\n💡 Hint: {suggestion}")]
    ManifestNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse dependencies: {message}")]
    Parse { message: String },

    #[error("Dependency resolution failed:\n{details}\n\n💡 Hint: Verify that the declared constraints are satisfiable and that the `uv` binary is installed and on PATH")]
    Resolution { details: String },

    #[error("Unsupported output format: {details}")]
    UnsupportedFormat { details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Output file already exists: {path}\n\n💡 Hint: Pass --force to allow overwriting existing files")]
    OutputExists { path: PathBuf },
}

impl PruneError {
    /// Shorthand for a ParseError with a formatted message.
    pub fn parse(message: impl Into<String>) -> Self {
        PruneError::Parse {
            message: message.into(),
        }
    }

    /// Shorthand for a ResolutionError with attached diagnostics.
    pub fn resolution(details: impl Into<String>) -> Self {
        PruneError::Resolution {
            details: details.into(),
        }
    }
}
