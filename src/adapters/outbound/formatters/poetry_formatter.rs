use std::collections::HashSet;

use toml_edit::{DocumentMut, Item, TableLike};

use crate::adapters::outbound::filesystem::manifest_reader::poetry_extras_index;
use crate::ports::outbound::ManifestFormatter;
use crate::pruning::domain::{DepKey, Dependency, ProjectDependencies};
use crate::shared::error::PruneError;
use crate::shared::Result;

/// PoetryFormatter adapter emitting a poetry-style pyproject.toml
///
/// Filters the original poetry document's dependency tables in place
/// against the retained key set. Requires the project to have originated
/// from a poetry manifest; synthesizing a poetry document from another
/// dialect is not supported.
pub struct PoetryFormatter;

impl PoetryFormatter {
    pub fn new() -> Self {
        Self
    }

    fn filter_document(doc: &mut DocumentMut, kept: &HashSet<DepKey>) {
        let Some(poetry) = doc
            .get_mut("tool")
            .and_then(Item::as_table_like_mut)
            .and_then(|t| t.get_mut("poetry"))
            .and_then(Item::as_table_like_mut)
        else {
            return;
        };

        let extras_index = poetry_extras_index(&*poetry);

        if let Some(deps) = poetry
            .get_mut("dependencies")
            .and_then(Item::as_table_like_mut)
        {
            retain_entries(deps, |name| {
                // the interpreter constraint is not a dependency
                if name == "python" {
                    return true;
                }
                let extra = extras_index.get(&name.to_lowercase()).map(String::as_str);
                kept.contains(&DepKey::with_context(name, None, extra))
            });
        }

        if let Some(groups) = poetry.get_mut("group").and_then(Item::as_table_like_mut) {
            let names: Vec<String> = groups.iter().map(|(key, _)| key.to_string()).collect();
            for group in names {
                if let Some(deps) = groups
                    .get_mut(&group)
                    .and_then(Item::as_table_like_mut)
                    .and_then(|t| t.get_mut("dependencies"))
                    .and_then(Item::as_table_like_mut)
                {
                    retain_entries(deps, |name| {
                        kept.contains(&DepKey::with_context(name, Some(&group), None))
                    });
                }
            }
        }

        if let Some(deps) = poetry
            .get_mut("dev-dependencies")
            .and_then(Item::as_table_like_mut)
        {
            retain_entries(deps, |name| {
                kept.contains(&DepKey::with_context(name, Some("dev"), None))
            });
        }

        if let Some(extras) = poetry.get_mut("extras").and_then(Item::as_table_like_mut) {
            let names: Vec<String> = extras.iter().map(|(key, _)| key.to_string()).collect();
            for extra in names {
                if let Some(members) = extras.get_mut(&extra).and_then(Item::as_array_mut) {
                    members.retain(|member| match member.as_str() {
                        Some(name) => {
                            kept.contains(&DepKey::with_context(name, None, Some(&extra)))
                        }
                        None => true,
                    });
                }
            }
        }
    }
}

impl Default for PoetryFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestFormatter for PoetryFormatter {
    fn format(&self, project: &ProjectDependencies) -> Result<String> {
        let Some(source) = &project.poetry_source else {
            return Err(PruneError::UnsupportedFormat {
                details: "converting a non-Poetry project into a Poetry manifest is not supported yet"
                    .to_string(),
            }
            .into());
        };

        let kept: HashSet<DepKey> = project.direct.iter().map(Dependency::key).collect();
        let mut doc = source.clone();
        Self::filter_document(&mut doc, &kept);
        Ok(doc.to_string())
    }
}

/// Removes table entries the predicate rejects, preserving the order and
/// formatting of everything that stays.
fn retain_entries(table: &mut dyn TableLike, mut keep: impl FnMut(&str) -> bool) {
    let remove: Vec<String> = table
        .iter()
        .filter(|(name, _)| !keep(name))
        .map(|(name, _)| name.to_string())
        .collect();
    for name in remove {
        table.remove(&name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pruning::domain::SourceFormat;
    use std::collections::BTreeSet;

    fn poetry_project(manifest: &str, direct: Vec<Dependency>) -> ProjectDependencies {
        let mut project = ProjectDependencies::new(direct, SourceFormat::Poetry);
        project.poetry_source = Some(manifest.parse().unwrap());
        project
    }

    #[test]
    fn test_filters_main_dependencies_keeping_python() {
        let manifest = r#"
[tool.poetry]
name = "demo"

[tool.poetry.dependencies]
python = "^3.10"
requests = "2.32.3"
leftover = "1.0"
"#;
        let project = poetry_project(manifest, vec![Dependency::new("requests")]);
        let output = PoetryFormatter::new().format(&project).unwrap();

        let doc: DocumentMut = output.parse().unwrap();
        let deps = doc["tool"]["poetry"]["dependencies"].as_table().unwrap();
        assert!(deps.contains_key("python"));
        assert!(deps.contains_key("requests"));
        assert!(!deps.contains_key("leftover"));
    }

    #[test]
    fn test_filters_group_tables_by_context() {
        let manifest = r#"
[tool.poetry]
name = "demo"

[tool.poetry.dependencies]
python = "^3.10"

[tool.poetry.group.dev.dependencies]
pytest = "^8.0"
coverage = "^7.0"
"#;
        let mut pytest = Dependency::new("pytest");
        pytest.groups = BTreeSet::from(["dev".to_string()]);
        let project = poetry_project(manifest, vec![pytest]);

        let output = PoetryFormatter::new().format(&project).unwrap();
        let doc: DocumentMut = output.parse().unwrap();
        let deps = doc["tool"]["poetry"]["group"]["dev"]["dependencies"]
            .as_table()
            .unwrap();
        assert!(deps.contains_key("pytest"));
        assert!(!deps.contains_key("coverage"));
    }

    #[test]
    fn test_filters_extras_members() {
        let manifest = r#"
[tool.poetry]
name = "demo"

[tool.poetry.dependencies]
python = "^3.10"
torch = { version = "^2.0", optional = true }
triton = { version = "^3.0", optional = true }

[tool.poetry.extras]
gpu = ["torch", "triton"]
"#;
        let mut torch = Dependency::new("torch");
        torch.extras = BTreeSet::from(["gpu".to_string()]);
        let project = poetry_project(manifest, vec![torch]);

        let output = PoetryFormatter::new().format(&project).unwrap();
        let doc: DocumentMut = output.parse().unwrap();

        let members: Vec<&str> = doc["tool"]["poetry"]["extras"]["gpu"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(members, vec!["torch"]);

        let deps = doc["tool"]["poetry"]["dependencies"].as_table().unwrap();
        assert!(deps.contains_key("torch"));
        assert!(!deps.contains_key("triton"));
    }

    #[test]
    fn test_rejects_non_poetry_project() {
        let project = ProjectDependencies::new(vec![], SourceFormat::Uv);
        let result = PoetryFormatter::new().format(&project);
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("not supported"));
    }
}
