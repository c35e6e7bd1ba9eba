use std::path::PathBuf;

/// PruneRequest - Internal request DTO for the pruning use case
#[derive(Debug, Clone)]
pub struct PruneRequest {
    /// Path to the dependency manifest to process
    pub manifest_path: PathBuf,
    /// Interpreter-version constraint override from the command line;
    /// wins over the manifest's own constraint
    pub python_version: Option<String>,
}

impl PruneRequest {
    pub fn new(manifest_path: PathBuf, python_version: Option<String>) -> Self {
        Self {
            manifest_path,
            python_version,
        }
    }
}
