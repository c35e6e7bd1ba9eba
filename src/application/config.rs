use toml_edit::{DocumentMut, Item};

use crate::pruning::domain::ProjectDependencies;

/// Tool defaults read from the `[tool.uv-prune]` table of the input
/// pyproject.toml, merged beneath command-line flags (the CLI always
/// wins). Requirements manifests have no config source.
#[derive(Debug, Clone, Default)]
pub struct PruneConfig {
    /// Default interpreter-version constraint for resolution
    pub python_version: Option<String>,
    /// Default output format name (`uv`, `poetry`, `requirements`)
    pub format: Option<String>,
}

impl PruneConfig {
    pub fn from_project(project: &ProjectDependencies) -> Self {
        let doc = project
            .uv_source
            .as_ref()
            .or(project.poetry_source.as_ref());
        let Some(doc) = doc else {
            return Self::default();
        };
        Self::from_document(doc)
    }

    fn from_document(doc: &DocumentMut) -> Self {
        let table = doc
            .get("tool")
            .and_then(Item::as_table_like)
            .and_then(|t| t.get("uv-prune"))
            .and_then(Item::as_table_like);

        let Some(table) = table else {
            return Self::default();
        };

        let string_of = |key: &str| {
            table
                .get(key)
                .and_then(Item::as_str)
                .map(str::to_string)
        };

        Self {
            python_version: string_of("python-version"),
            format: string_of("format"),
        }
    }
}
