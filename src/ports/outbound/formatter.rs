use crate::pruning::domain::ProjectDependencies;
use crate::shared::Result;

/// ManifestFormatter port for re-serializing pruned dependencies
///
/// This port abstracts the output dialect (uv pyproject, poetry
/// pyproject, requirements.txt). Formatters filter the original raw
/// document section by section against the retained key set; they never
/// reorder or reformat entries that survive.
pub trait ManifestFormatter {
    /// Formats the pruned project into the target manifest dialect
    ///
    /// # Arguments
    /// * `project` - The pruned project dependencies
    ///
    /// # Returns
    /// The complete manifest text in the target dialect
    ///
    /// # Errors
    /// Returns an error if the target dialect cannot represent the
    /// project (e.g. poetry output for a project without a poetry source)
    fn format(&self, project: &ProjectDependencies) -> Result<String>;
}
