use std::collections::{HashSet, VecDeque};

use crate::pruning::domain::{DepKey, ProjectDependencies};

/// Computes the reachable closure of the dependency graph and discards
/// everything outside it.
pub struct DependencyPruner;

impl DependencyPruner {
    /// Returns a new [`ProjectDependencies`] whose graph is restricted to
    /// keys reachable from the direct declarations.
    ///
    /// All direct keys survive by construction (they seed the traversal);
    /// only transitive entries with no inbound path from any root are
    /// dropped. The traversal maintains a visited set, so an accidental
    /// cycle in the lock graph can never loop.
    pub fn prune(project: &ProjectDependencies) -> ProjectDependencies {
        let retained = Self::reachable_keys(project);

        let direct = project
            .direct
            .iter()
            .filter(|dep| retained.contains(&dep.key()))
            .cloned()
            .collect();

        let graph = project
            .graph
            .iter()
            .filter(|(key, _)| retained.contains(*key))
            .map(|(key, deps)| (key.clone(), deps.clone()))
            .collect();

        ProjectDependencies {
            direct,
            graph,
            source_format: project.source_format,
            py_version: project.py_version.clone(),
            uv_source: project.uv_source.clone(),
            poetry_source: project.poetry_source.clone(),
        }
    }

    /// Breadth-first closure over the graph, seeded with the direct keys
    /// in declaration order (deterministic diagnostics).
    fn reachable_keys(project: &ProjectDependencies) -> HashSet<DepKey> {
        let mut visited: HashSet<DepKey> = HashSet::new();
        let mut queue: VecDeque<DepKey> = VecDeque::new();

        for key in project.direct_keys() {
            if visited.insert(key.clone()) {
                queue.push_back(key);
            }
        }

        while let Some(key) = queue.pop_front() {
            // A key without a graph entry is a leaf: the resolver may
            // legitimately omit platform-filtered dependencies.
            let Some(deps) = project.graph.get(&key) else {
                continue;
            };
            for dep in deps {
                if visited.insert(dep.clone()) {
                    queue.push_back(dep.clone());
                }
            }
        }

        visited
    }
}
