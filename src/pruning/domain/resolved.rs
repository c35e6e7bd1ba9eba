use std::collections::HashMap;

use anyhow::Context;
use serde::Deserialize;

use crate::shared::Result;

/// The externally resolved, fully version-pinned flat dependency graph.
///
/// Package and dependency names are lower-cased bare identifiers; the lock
/// carries no group or extra context. This is the ground truth for
/// transitive relationships.
#[derive(Debug, Clone, Default)]
pub struct ResolvedGraph {
    pub packages: Vec<ResolvedPackage>,
}

/// One package entry of the resolved lock.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: String,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UvLock {
    #[serde(default)]
    package: Vec<UvLockPackage>,
}

#[derive(Debug, Deserialize)]
struct UvLockPackage {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    dependencies: Vec<UvLockDependency>,
}

#[derive(Debug, Deserialize)]
struct UvLockDependency {
    name: String,
}

impl ResolvedGraph {
    /// Parses a `uv.lock` document into the flat graph, lower-casing all
    /// package and dependency names.
    pub fn parse_uv_lock(content: &str) -> Result<Self> {
        let lock: UvLock = toml::from_str(content).context("Invalid uv.lock file")?;

        let packages = lock
            .package
            .into_iter()
            .map(|pkg| ResolvedPackage {
                name: pkg.name.to_lowercase(),
                version: pkg.version,
                dependencies: pkg
                    .dependencies
                    .into_iter()
                    .map(|dep| dep.name.to_lowercase())
                    .collect(),
            })
            .collect();

        Ok(Self { packages })
    }

    /// Bare name → dependency names adjacency view.
    pub fn dependency_map(&self) -> HashMap<&str, &[String]> {
        self.packages
            .iter()
            .map(|pkg| (pkg.name.as_str(), pkg.dependencies.as_slice()))
            .collect()
    }

    /// Bare name → resolved version.
    pub fn version_map(&self) -> HashMap<String, String> {
        self.packages
            .iter()
            .map(|pkg| (pkg.name.clone(), pkg.version.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uv_lock() {
        let content = r#"
version = 1
requires-python = ">=3.8"

[[package]]
name = "requests"
version = "2.32.3"
source = { registry = "https://pypi.org/simple" }
dependencies = [
    { name = "urllib3" },
    { name = "certifi" },
]

[[package]]
name = "urllib3"
version = "2.2.0"
source = { registry = "https://pypi.org/simple" }

[[package]]
name = "certifi"
version = "2024.8.30"
source = { registry = "https://pypi.org/simple" }
"#;

        let graph = ResolvedGraph::parse_uv_lock(content).unwrap();
        assert_eq!(graph.packages.len(), 3);
        assert_eq!(graph.packages[0].name, "requests");
        assert_eq!(graph.packages[0].version, "2.32.3");
        assert_eq!(graph.packages[0].dependencies, vec!["urllib3", "certifi"]);
        assert!(graph.packages[1].dependencies.is_empty());
    }

    #[test]
    fn test_parse_uv_lock_lowercases_names() {
        let content = r#"
[[package]]
name = "Django"
version = "5.0"
dependencies = [{ name = "ASGIref" }]
"#;

        let graph = ResolvedGraph::parse_uv_lock(content).unwrap();
        assert_eq!(graph.packages[0].name, "django");
        assert_eq!(graph.packages[0].dependencies, vec!["asgiref"]);
    }

    #[test]
    fn test_parse_uv_lock_invalid_toml() {
        assert!(ResolvedGraph::parse_uv_lock("invalid [[[").is_err());
    }

    #[test]
    fn test_parse_uv_lock_empty_document() {
        let graph = ResolvedGraph::parse_uv_lock("version = 1\n").unwrap();
        assert!(graph.packages.is_empty());
    }

    #[test]
    fn test_dependency_map() {
        let content = r#"
[[package]]
name = "requests"
version = "2.32.3"
dependencies = [{ name = "urllib3" }]

[[package]]
name = "urllib3"
version = "2.2.0"
"#;
        let graph = ResolvedGraph::parse_uv_lock(content).unwrap();
        let map = graph.dependency_map();
        assert_eq!(
            map.get("requests").copied(),
            Some(["urllib3".to_string()].as_slice())
        );
        assert!(map.get("urllib3").unwrap().is_empty());
    }

    #[test]
    fn test_version_map() {
        let content = r#"
[[package]]
name = "requests"
version = "2.32.3"
"#;
        let graph = ResolvedGraph::parse_uv_lock(content).unwrap();
        assert_eq!(
            graph.version_map().get("requests"),
            Some(&"2.32.3".to_string())
        );
    }
}
