use std::fs;
use std::process::Command;

use toml_edit::{value, Array, ArrayOfTables, DocumentMut, InlineTable, Item, Table};

use crate::ports::outbound::DependencyResolver;
use crate::pruning::domain::{Dependency, ResolvedGraph};
use crate::shared::error::PruneError;
use crate::shared::Result;

/// Name given to the throwaway project the resolver locks.
const RESOLUTION_PROJECT_NAME: &str = "uv-prune-resolution";

/// UvLockResolver adapter resolving the dependency graph through `uv`
///
/// Implements the DependencyResolver port by writing the direct
/// declarations into a temporary project, running `uv lock` against it,
/// and parsing the produced `uv.lock`. The temporary directory lives
/// exactly as long as the call; the subprocess blocks until completion
/// and is never retried.
pub struct UvLockResolver;

impl UvLockResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UvLockResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyResolver for UvLockResolver {
    fn resolve(&self, direct: &[Dependency], py_version: &str) -> Result<ResolvedGraph> {
        let workdir = tempfile::tempdir().map_err(|e| {
            PruneError::resolution(format!("Failed to create temporary project directory: {e}"))
        })?;

        let manifest = render_resolution_manifest(direct, py_version);
        fs::write(workdir.path().join("pyproject.toml"), manifest).map_err(|e| {
            PruneError::resolution(format!("Failed to write temporary pyproject.toml: {e}"))
        })?;

        let output = Command::new("uv")
            .arg("lock")
            .arg("--prerelease=allow")
            .arg("--directory")
            .arg(workdir.path())
            .output()
            .map_err(|e| {
                PruneError::resolution(format!("Failed to launch the `uv` binary: {e}"))
            })?;

        if !output.status.success() {
            return Err(PruneError::resolution(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            )
            .into());
        }

        let lock_path = workdir.path().join("uv.lock");
        if !lock_path.exists() {
            return Err(PruneError::resolution("uv.lock was not generated").into());
        }

        let content = fs::read_to_string(&lock_path)
            .map_err(|e| PruneError::resolution(format!("Failed to read uv.lock: {e}")))?;

        ResolvedGraph::parse_uv_lock(&content)
            .map_err(|e| PruneError::resolution(format!("{e:#}")).into())
    }
}

/// Renders the dummy project manifest `uv lock` resolves against.
///
/// Declarations carrying a custom index additionally produce matching
/// `[tool.uv.sources]` and `[[tool.uv.index]]` entries so resolution uses
/// the declared registry.
fn render_resolution_manifest(direct: &[Dependency], py_version: &str) -> String {
    let mut doc = DocumentMut::new();

    let mut project = Table::new();
    project["name"] = value(RESOLUTION_PROJECT_NAME);
    project["version"] = value("0.1.0");
    project["description"] = value("Temporary project for dependency resolution");
    project["requires-python"] = value(py_version);

    let mut dependencies = Array::new();
    for dep in direct {
        dependencies.push(dep.to_requirement_string());
    }
    project["dependencies"] = value(dependencies);
    doc["project"] = Item::Table(project);

    let indexed: Vec<&Dependency> = direct.iter().filter(|d| d.custom_index.is_some()).collect();
    if !indexed.is_empty() {
        let mut sources = Table::new();
        let mut index = ArrayOfTables::new();
        for dep in indexed {
            let mut source = InlineTable::new();
            source.insert("index", dep.name.as_str().into());
            sources[dep.name.as_str()] = value(source);

            let mut entry = Table::new();
            entry["name"] = value(dep.name.as_str());
            entry["url"] = value(dep.custom_index.clone().unwrap_or_default());
            index.push(entry);
        }

        let mut uv = Table::new();
        uv.set_implicit(true);
        uv["sources"] = Item::Table(sources);
        uv["index"] = Item::ArrayOfTables(index);

        let mut tool = Table::new();
        tool.set_implicit(true);
        tool["uv"] = Item::Table(uv);
        doc["tool"] = Item::Table(tool);
    }

    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_resolution_manifest_basic() {
        let mut requests = Dependency::new("requests");
        requests.constraint = Some(">=2.0".to_string());
        let manifest = render_resolution_manifest(&[requests], ">=3.10");

        let doc: DocumentMut = manifest.parse().unwrap();
        assert_eq!(
            doc["project"]["name"].as_str(),
            Some(RESOLUTION_PROJECT_NAME)
        );
        assert_eq!(doc["project"]["requires-python"].as_str(), Some(">=3.10"));
        let deps = doc["project"]["dependencies"].as_array().unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps.get(0).and_then(|v| v.as_str()), Some("requests>=2.0"));
    }

    #[test]
    fn test_render_resolution_manifest_custom_index() {
        let mut torch = Dependency::new("torch");
        torch.custom_index = Some("https://download.pytorch.org/whl/cpu".to_string());
        let manifest = render_resolution_manifest(&[torch], ">=3.10");

        let doc: DocumentMut = manifest.parse().unwrap();
        let sources = doc["tool"]["uv"]["sources"].as_table().unwrap();
        assert!(sources.contains_key("torch"));
        let index = doc["tool"]["uv"]["index"].as_array_of_tables().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.iter().next().unwrap()["url"].as_str(),
            Some("https://download.pytorch.org/whl/cpu")
        );
    }

    #[test]
    fn test_render_resolution_manifest_no_tool_table_without_indexes() {
        let manifest = render_resolution_manifest(&[Dependency::new("requests")], ">=3.8");
        let doc: DocumentMut = manifest.parse().unwrap();
        assert!(doc.get("tool").is_none());
    }
}
