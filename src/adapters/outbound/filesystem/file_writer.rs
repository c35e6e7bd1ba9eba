use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::ports::outbound::OutputPresenter;
use crate::shared::error::PruneError;
use crate::shared::Result;

/// FileSystemWriter adapter for writing output to files
///
/// Implements the OutputPresenter port for file output. Refuses to
/// overwrite an existing file unless overwriting was explicitly allowed.
pub struct FileSystemWriter {
    output_path: PathBuf,
    force: bool,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf, force: bool) -> Self {
        Self { output_path, force }
    }

    /// Validates that the parent directory exists before writing
    fn validate_parent_directory(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.exists() && parent != Path::new("") {
                return Err(PruneError::FileWriteError {
                    path: self.output_path.clone(),
                    details: format!("Parent directory does not exist: {}", parent.display()),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        if self.output_path.exists() && !self.force {
            return Err(PruneError::OutputExists {
                path: self.output_path.clone(),
            }
            .into());
        }

        self.validate_parent_directory()?;

        fs::write(&self.output_path, content).map_err(|e| {
            PruneError::FileWriteError {
                path: self.output_path.clone(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

/// StdoutPresenter adapter for writing output to standard output
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(content.as_bytes())
            .and_then(|_| handle.flush())
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.toml");

        let writer = FileSystemWriter::new(path.clone(), false);
        writer.present("content").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.toml");
        fs::write(&path, "original").unwrap();

        let writer = FileSystemWriter::new(path.clone(), false);
        let result = writer.present("replacement");

        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_overwrites_with_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.toml");
        fs::write(&path, "original").unwrap();

        let writer = FileSystemWriter::new(path.clone(), true);
        writer.present("replacement").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "replacement");
    }

    #[test]
    fn test_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.toml");

        let writer = FileSystemWriter::new(path, false);
        let result = writer.present("content");

        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("Parent directory does not exist"));
    }
}
