use crate::pruning::domain::ProjectDependencies;
use crate::shared::Result;
use std::path::Path;

/// ManifestReader port for reading dependency manifests
///
/// This port abstracts the file system operations and dialect parsing
/// needed to turn a manifest file into the project's direct dependency
/// declarations plus the raw document carried through for re-emission.
pub trait ManifestReader {
    /// Reads and parses the dependency manifest at the given path
    ///
    /// # Arguments
    /// * `path` - Path to the manifest file (`requirements.txt` or
    ///   `pyproject.toml`)
    ///
    /// # Returns
    /// A [`ProjectDependencies`] with the direct declarations in manifest
    /// order, the detected source format, and the raw source document.
    /// The dependency graph is empty until correlation.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The manifest dialect cannot be determined
    /// - A declaration is malformed beyond recovery
    fn read_manifest(&self, path: &Path) -> Result<ProjectDependencies>;
}
