use crate::pruning::domain::{Dependency, ResolvedGraph};
use crate::shared::Result;

/// DependencyResolver port for resolving the transitive dependency graph
///
/// This port abstracts the external resolver. Given the direct
/// declarations and a target interpreter-version constraint it returns the
/// fully version-resolved flat graph. The core treats the resolver as an
/// opaque black box and never retries.
pub trait DependencyResolver {
    /// Resolves the complete dependency graph for the given declarations
    ///
    /// # Arguments
    /// * `direct` - Direct dependency declarations to resolve
    /// * `py_version` - Interpreter-version constraint driving resolution
    ///
    /// # Returns
    /// The resolved flat graph (bare package name → dependency names)
    ///
    /// # Errors
    /// Returns an error if:
    /// - The resolver process cannot be launched
    /// - Resolution fails (unsatisfiable constraints, registry failure)
    /// - The produced lock data is missing or structurally invalid
    fn resolve(&self, direct: &[Dependency], py_version: &str) -> Result<ResolvedGraph>;
}
