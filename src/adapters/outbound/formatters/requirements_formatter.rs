use crate::ports::outbound::ManifestFormatter;
use crate::pruning::domain::ProjectDependencies;
use crate::shared::Result;

/// RequirementsFormatter adapter emitting a requirements.txt
///
/// Emits one line per retained main-context declaration, pinned to the
/// locked version when one is known, in declaration order. Group and
/// extra contexts are skipped; requirements files cannot express them.
pub struct RequirementsFormatter;

impl RequirementsFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RequirementsFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestFormatter for RequirementsFormatter {
    fn format(&self, project: &ProjectDependencies) -> Result<String> {
        let mut lines = vec!["# Generated by uv-prune".to_string()];

        for dep in &project.direct {
            if !dep.groups.is_empty() || !dep.extras.is_empty() {
                continue;
            }
            lines.push(dep.to_pinned_string());
        }

        lines.push(String::new());
        Ok(lines.join("\n"))
    }
}
