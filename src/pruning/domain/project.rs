use std::collections::HashMap;
use std::path::Path;

use toml_edit::DocumentMut;

use crate::pruning::domain::{DepKey, Dependency};
use crate::shared::{PruneError, Result};

/// Which manifest dialect a project's dependencies originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Requirements,
    Poetry,
    Uv,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Requirements => "requirements",
            SourceFormat::Poetry => "poetry",
            SourceFormat::Uv => "uv",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Guesses the manifest dialect from the file name and content.
///
/// Any `*requirements.txt` file is a requirements manifest. A
/// `pyproject.toml` is Poetry when it carries `[tool.poetry]` and uv when
/// it carries `[project]`. Everything else is undetectable.
pub fn detect_source_format(path: &Path, content: &str) -> Result<SourceFormat> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if file_name.ends_with("requirements.txt") {
        return Ok(SourceFormat::Requirements);
    }

    if file_name != "pyproject.toml" {
        return Err(PruneError::parse(format!(
            "Cannot determine format of {}",
            path.display()
        ))
        .into());
    }

    let doc: DocumentMut = content.parse().map_err(|e| {
        PruneError::parse(format!("Invalid TOML in {}: {}", path.display(), e))
    })?;

    let has_poetry = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .is_some();
    if has_poetry {
        return Ok(SourceFormat::Poetry);
    }

    if doc.get("project").is_some() {
        return Ok(SourceFormat::Uv);
    }

    Err(PruneError::parse(format!(
        "Cannot determine format of {}",
        path.display()
    ))
    .into())
}

/// The parsed project state: ordered direct declarations, the correlated
/// keyed graph, and the raw manifest documents carried through for
/// re-serialization.
///
/// Built once per run by the manifest reader and the correlator, turned
/// into a new pruned instance by the pruner, and consumed exactly once by
/// a formatter.
#[derive(Debug, Clone)]
pub struct ProjectDependencies {
    /// Direct declarations in manifest order; ordering must be preserved
    /// for stable output
    pub direct: Vec<Dependency>,
    /// Keyed dependency graph, populated by the correlator
    pub graph: HashMap<DepKey, Vec<DepKey>>,
    /// Which dialect the manifest was written in
    pub source_format: SourceFormat,
    /// Interpreter-version constraint driving resolution
    pub py_version: Option<String>,
    /// Raw uv pyproject document; only dependency arrays are touched on output
    pub uv_source: Option<DocumentMut>,
    /// Raw poetry pyproject document, same contract
    pub poetry_source: Option<DocumentMut>,
}

impl ProjectDependencies {
    pub fn new(direct: Vec<Dependency>, source_format: SourceFormat) -> Self {
        Self {
            direct,
            graph: HashMap::new(),
            source_format,
            py_version: None,
            uv_source: None,
            poetry_source: None,
        }
    }

    /// Keys of all direct declarations, in declaration order.
    pub fn direct_keys(&self) -> Vec<DepKey> {
        self.direct.iter().map(Dependency::key).collect()
    }
}
