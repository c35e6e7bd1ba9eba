use uv_prune::prelude::*;

/// Mock DependencyResolver for testing
pub struct MockResolver {
    graph: ResolvedGraph,
    should_fail: bool,
}

impl MockResolver {
    pub fn new(graph: ResolvedGraph) -> Self {
        Self {
            graph,
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            graph: ResolvedGraph::default(),
            should_fail: true,
        }
    }

    /// Builds a resolved graph from `(name, version, deps)` triples.
    pub fn from_packages(packages: &[(&str, &str, &[&str])]) -> Self {
        let packages = packages
            .iter()
            .map(|(name, version, deps)| ResolvedPackage {
                name: name.to_string(),
                version: version.to_string(),
                dependencies: deps.iter().map(|d| d.to_string()).collect(),
            })
            .collect();
        Self::new(ResolvedGraph { packages })
    }
}

impl DependencyResolver for MockResolver {
    fn resolve(&self, _direct: &[Dependency], _py_version: &str) -> Result<ResolvedGraph> {
        if self.should_fail {
            anyhow::bail!("Mock resolver failure");
        }
        Ok(self.graph.clone())
    }
}
