use std::path::Path;

use uv_prune::prelude::*;

/// Mock ManifestReader for testing
pub struct MockManifestReader {
    project: ProjectDependencies,
}

impl MockManifestReader {
    pub fn new(project: ProjectDependencies) -> Self {
        Self { project }
    }
}

impl ManifestReader for MockManifestReader {
    fn read_manifest(&self, _path: &Path) -> Result<ProjectDependencies> {
        Ok(self.project.clone())
    }
}
