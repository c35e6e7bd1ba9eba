use crate::application::config::PruneConfig;
use crate::application::dto::{PruneRequest, PruneResponse};
use crate::ports::outbound::{DependencyResolver, ManifestReader, ProgressReporter};
use crate::pruning::services::{correlate, DependencyPruner};
use crate::shared::error::PruneError;
use crate::shared::Result;

/// PruneDependenciesUseCase - Core use case of the tool
///
/// Orchestrates the pipeline: read and extract the manifest, resolve the
/// transitive graph through the external resolver, correlate the lock
/// with the declared contexts, prune unreachable entries. All
/// infrastructure arrives through generic dependency injection.
///
/// # Type Parameters
/// * `MR` - ManifestReader implementation
/// * `RES` - DependencyResolver implementation
/// * `PR` - ProgressReporter implementation
pub struct PruneDependenciesUseCase<MR, RES, PR> {
    manifest_reader: MR,
    resolver: RES,
    progress_reporter: PR,
}

impl<MR, RES, PR> PruneDependenciesUseCase<MR, RES, PR>
where
    MR: ManifestReader,
    RES: DependencyResolver,
    PR: ProgressReporter,
{
    /// Creates a new PruneDependenciesUseCase with injected dependencies
    pub fn new(manifest_reader: MR, resolver: RES, progress_reporter: PR) -> Self {
        Self {
            manifest_reader,
            resolver,
            progress_reporter,
        }
    }

    /// Executes the pruning pipeline
    ///
    /// # Arguments
    /// * `request` - Manifest path plus command-line overrides
    ///
    /// # Returns
    /// PruneResponse containing the pruned project, ready for a formatter
    pub fn execute(&self, request: PruneRequest) -> Result<PruneResponse> {
        self.progress_reporter.report(&format!(
            "📖 Reading dependency manifest: {}",
            request.manifest_path.display()
        ));

        let mut project = self.manifest_reader.read_manifest(&request.manifest_path)?;

        self.progress_reporter.report(&format!(
            "✅ Found {} direct declaration(s) ({} format)",
            project.direct.len(),
            project.source_format
        ));
        for dep in &project.direct {
            self.progress_reporter
                .report_debug(&format!("   {}", dep.key()));
        }

        let py_version = self.determine_py_version(&request, &project)?;

        self.progress_reporter
            .begin_step("🔒 Resolving dependency graph with uv...");
        let resolved = self.resolver.resolve(&project.direct, &py_version);
        self.progress_reporter.end_step();
        let resolved = resolved?;

        self.progress_reporter
            .report(&format!("✅ Resolved {} package(s)", resolved.packages.len()));

        let correlated = correlate(&resolved, &project.direct);
        for dep in &mut project.direct {
            dep.pinned_version = correlated.versions.get(dep.key().name()).cloned();
        }
        project.graph = correlated.graph;
        project.py_version = Some(py_version);

        let pruned = DependencyPruner::prune(&project);
        let dropped = project.graph.len() - pruned.graph.len();

        self.progress_reporter.report_completion(&format!(
            "✨ Retained {} dependency key(s), dropped {} unreferenced entr{}",
            pruned.graph.len(),
            dropped,
            if dropped == 1 { "y" } else { "ies" }
        ));

        Ok(PruneResponse::new(pruned))
    }

    /// CLI override > manifest constraint > `[tool.uv-prune]` default.
    fn determine_py_version(
        &self,
        request: &PruneRequest,
        project: &crate::pruning::domain::ProjectDependencies,
    ) -> Result<String> {
        let config = PruneConfig::from_project(project);
        request
            .python_version
            .clone()
            .or_else(|| project.py_version.clone())
            .or(config.python_version)
            .ok_or_else(|| {
                PruneError::parse(
                    "A Python version is required to resolve dependencies. \
                     Declare requires-python in the manifest or pass --python-version",
                )
                .into()
            })
    }
}
