use std::collections::HashMap;

use crate::pruning::domain::{DepKey, Dependency, ResolvedGraph};

/// Output of lock correlation: the graph keyed by full
/// `(name, groups, extras)` identity, plus the lock's bare name → version
/// map so callers can stamp resolved pins onto direct declarations.
#[derive(Debug, Clone)]
pub struct CorrelatedGraph {
    pub graph: HashMap<DepKey, Vec<DepKey>>,
    pub versions: HashMap<String, String>,
}

/// Merges the externally resolved flat graph with the direct declaration
/// keys, producing a graph keyed by the richer identity.
///
/// Two explicit passes keep the completeness guarantee auditable:
///
/// 1. every resolved package whose bare name matches a direct declaration
///    gains one entry per matching full key; each dependency name is
///    rewritten to the key of the first direct declaration sharing that
///    bare name (adopting its groups/extras), else kept bare;
/// 2. every resolved package matched by no direct declaration gains a
///    bare-key entry with its raw dependency list, so purely transitive
///    chains stay complete.
///
/// A direct declaration missing from the lock ends up with no graph entry;
/// the pruner treats it as a leaf (resolution may legitimately omit
/// platform-filtered dependencies).
pub fn correlate(resolved: &ResolvedGraph, direct: &[Dependency]) -> CorrelatedGraph {
    // Bare name → full keys sharing that name, in declaration order.
    let mut by_name: HashMap<String, Vec<DepKey>> = HashMap::new();
    for dep in direct {
        let key = dep.key();
        by_name.entry(key.name().to_string()).or_default().push(key);
    }

    let rewrite = |bare: &str| -> DepKey {
        by_name
            .get(bare)
            .and_then(|keys| keys.first())
            .cloned()
            .unwrap_or_else(|| DepKey::bare(bare))
    };

    let mut graph: HashMap<DepKey, Vec<DepKey>> = HashMap::new();

    for package in &resolved.packages {
        if let Some(keys) = by_name.get(package.name.as_str()) {
            let deps: Vec<DepKey> = package
                .dependencies
                .iter()
                .map(|name| rewrite(name))
                .collect();
            for key in keys {
                graph.insert(key.clone(), deps.clone());
            }
        }
    }

    for package in &resolved.packages {
        if by_name.contains_key(package.name.as_str()) {
            continue;
        }
        graph.insert(
            DepKey::bare(&package.name),
            package
                .dependencies
                .iter()
                .map(|name| DepKey::bare(name))
                .collect(),
        );
    }

    CorrelatedGraph {
        graph,
        versions: resolved.version_map(),
    }
}
