use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use toml_edit::{DocumentMut, Item, TableLike};

use crate::ports::outbound::ManifestReader;
use crate::pruning::domain::{
    detect_source_format, Dependency, ProjectDependencies, SourceFormat,
};
use crate::pruning::services::{parse_requirement, parse_requirement_table};
use crate::shared::error::PruneError;
use crate::shared::Result;

/// Maximum file size for security (100 MB)
const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// FileSystemManifestReader adapter for reading dependency manifests
///
/// Implements the ManifestReader port: detects the manifest dialect and
/// parses it into the project's direct declarations, attaching
/// group/extra context and custom indexes from the section each entry
/// came from. The raw TOML document is kept alongside so formatters can
/// re-emit it with its original layout.
pub struct FileSystemManifestReader;

impl FileSystemManifestReader {
    pub fn new() -> Self {
        Self
    }

    /// Safely read a file with security checks:
    /// - Reject symbolic links
    /// - Check file size limits
    /// - Validate file is a regular file
    fn safe_read_file(&self, path: &Path, file_type: &str) -> Result<String> {
        let metadata = fs::symlink_metadata(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_type, e))?;

        if metadata.is_symlink() {
            anyhow::bail!(
                "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
                path.display()
            );
        }

        if !metadata.is_file() {
            anyhow::bail!("{} is not a regular file", path.display());
        }

        let file_size = metadata.len();
        if file_size > MAX_FILE_SIZE {
            anyhow::bail!(
                "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
                path.display(),
                file_size,
                MAX_FILE_SIZE
            );
        }

        fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_type, e))
    }

    fn parse_uv(&self, content: &str, path: &Path) -> Result<ProjectDependencies> {
        let doc: DocumentMut = content.parse().map_err(|e| {
            PruneError::parse(format!("Invalid TOML in {}: {}", path.display(), e))
        })?;

        let indexes = uv_index_urls(&doc);
        let sources = uv_source_indexes(&doc);
        let mut direct = Vec::new();

        if let Some(deps) = get(doc.as_item(), &["project", "dependencies"]).and_then(Item::as_array)
        {
            for entry in deps.iter() {
                push_requirement(&mut direct, entry.as_str(), None, None)?;
            }
        }

        if let Some(optional) =
            get(doc.as_item(), &["project", "optional-dependencies"]).and_then(Item::as_table_like)
        {
            for (extra, item) in optional.iter() {
                if let Some(entries) = item.as_array() {
                    for entry in entries.iter() {
                        push_requirement(&mut direct, entry.as_str(), None, Some(extra))?;
                    }
                }
            }
        }

        if let Some(groups) = doc.get("dependency-groups").and_then(Item::as_table_like) {
            for (group, item) in groups.iter() {
                if let Some(entries) = item.as_array() {
                    for entry in entries.iter() {
                        push_requirement(&mut direct, entry.as_str(), Some(group), None)?;
                    }
                }
            }
        }

        for dep in &mut direct {
            dep.custom_index = sources
                .get(&dep.name)
                .and_then(|index_name| indexes.get(index_name))
                .cloned();
        }

        let mut project = ProjectDependencies::new(direct, SourceFormat::Uv);
        project.py_version = get(doc.as_item(), &["project", "requires-python"])
            .and_then(Item::as_str)
            .map(str::to_string);
        project.uv_source = Some(doc);
        Ok(project)
    }

    fn parse_poetry(&self, content: &str, path: &Path) -> Result<ProjectDependencies> {
        let doc: DocumentMut = content.parse().map_err(|e| {
            PruneError::parse(format!("Invalid TOML in {}: {}", path.display(), e))
        })?;

        let Some(poetry) = get(doc.as_item(), &["tool", "poetry"]).and_then(Item::as_table_like)
        else {
            return Err(PruneError::parse(format!(
                "Missing [tool.poetry] table in {}",
                path.display()
            ))
            .into());
        };

        let extras_index = poetry_extras_index(poetry);
        let mut py_version = None;
        let mut direct = Vec::new();

        if let Some(deps) = poetry.get("dependencies").and_then(Item::as_table_like) {
            for (name, item) in deps.iter() {
                if name == "python" {
                    // poetry caret/tilde constraints are not valid PEP 440
                    py_version = item
                        .as_str()
                        .map(str::to_string)
                        .or_else(|| poetry_table_version(item))
                        .and_then(|v| {
                            crate::pruning::services::poetry_constraint_to_pep508(&v)
                        });
                    continue;
                }
                if let Some(mut dep) = poetry_entry(name, item)? {
                    if let Some(extra) = extras_index.get(&dep.name) {
                        dep.extras = BTreeSet::from([extra.clone()]);
                    }
                    direct.push(dep);
                }
            }
        }

        if let Some(groups) = poetry.get("group").and_then(Item::as_table_like) {
            for (group, item) in groups.iter() {
                let Some(deps) = item
                    .as_table_like()
                    .and_then(|t| t.get("dependencies"))
                    .and_then(Item::as_table_like)
                else {
                    continue;
                };
                for (name, entry) in deps.iter() {
                    if let Some(mut dep) = poetry_entry(name, entry)? {
                        dep.groups = BTreeSet::from([group.to_string()]);
                        direct.push(dep);
                    }
                }
            }
        }

        // Poetry <1.2 kept development dependencies in a dedicated table.
        if let Some(deps) = poetry.get("dev-dependencies").and_then(Item::as_table_like) {
            for (name, entry) in deps.iter() {
                if let Some(mut dep) = poetry_entry(name, entry)? {
                    dep.groups = BTreeSet::from(["dev".to_string()]);
                    direct.push(dep);
                }
            }
        }

        let mut project = ProjectDependencies::new(direct, SourceFormat::Poetry);
        project.py_version = py_version;
        project.poetry_source = Some(doc);
        Ok(project)
    }

    fn parse_requirements(&self, content: &str) -> Result<ProjectDependencies> {
        let mut direct = Vec::new();

        for line in content.lines() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('-') {
                eprintln!("⚠️  Warning: skipping requirements option line '{line}'");
                continue;
            }
            if let Some(dep) = parse_requirement(line)? {
                direct.push(dep);
            }
        }

        Ok(ProjectDependencies::new(direct, SourceFormat::Requirements))
    }
}

impl Default for FileSystemManifestReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestReader for FileSystemManifestReader {
    fn read_manifest(&self, path: &Path) -> Result<ProjectDependencies> {
        if !path.exists() {
            return Err(PruneError::ManifestNotFound {
                path: path.to_path_buf(),
                suggestion: format!(
                    "The manifest \"{}\" does not exist.\n   \
                     Point uv-prune at a requirements.txt or pyproject.toml file.",
                    path.display()
                ),
            }
            .into());
        }

        let content = self.safe_read_file(path, "dependency manifest")?;
        match detect_source_format(path, &content)? {
            SourceFormat::Requirements => self.parse_requirements(&content),
            SourceFormat::Poetry => self.parse_poetry(&content, path),
            SourceFormat::Uv => self.parse_uv(&content, path),
        }
    }
}

/// Navigates nested tables; `None` when any segment is missing.
fn get<'a>(item: &'a Item, segments: &[&str]) -> Option<&'a Item> {
    let mut current = item;
    for segment in segments {
        current = current.as_table_like()?.get(segment)?;
    }
    Some(current)
}

/// Parses one raw string entry and attaches its section context.
/// Non-string entries (e.g. `{include-group = "..."}`) are skipped with a
/// warning; they pass through unfiltered on re-emission.
fn push_requirement(
    direct: &mut Vec<Dependency>,
    entry: Option<&str>,
    group: Option<&str>,
    extra: Option<&str>,
) -> Result<()> {
    let Some(raw) = entry else {
        eprintln!("⚠️  Warning: found a non-flat dependency entry. This is not implemented yet.");
        return Ok(());
    };

    if let Some(mut dep) = parse_requirement(raw)? {
        if let Some(group) = group {
            dep.groups = BTreeSet::from([group.to_string()]);
        }
        if let Some(extra) = extra {
            dep.extras = BTreeSet::from([extra.to_string()]);
        }
        direct.push(dep);
    }
    Ok(())
}

/// One poetry dependency entry: a constraint string or a structured table.
/// Multi-constraint arrays are unsupported and skipped with a warning.
fn poetry_entry(name: &str, item: &Item) -> Result<Option<Dependency>> {
    if let Some(constraint) = item.as_str() {
        let mut dep = Dependency::new(name);
        dep.constraint = crate::pruning::services::poetry_constraint_to_pep508(constraint);
        dep.raw = dep.to_requirement_string();
        return Ok(Some(dep));
    }

    if let Some(table) = item.as_table_like() {
        return parse_requirement_table(name, table).map(Some);
    }

    eprintln!("⚠️  Warning: skipping unsupported poetry declaration for '{name}'");
    Ok(None)
}

fn poetry_table_version(item: &Item) -> Option<String> {
    item.as_table_like()?
        .get("version")?
        .as_str()
        .map(str::to_string)
}

/// Index name → URL from `[[tool.uv.index]]` (array-of-tables or inline).
fn uv_index_urls(doc: &DocumentMut) -> HashMap<String, String> {
    let mut urls = HashMap::new();
    let Some(index) = get(doc.as_item(), &["tool", "uv", "index"]) else {
        return urls;
    };

    let mut insert = |table: &dyn TableLike| {
        let name = table.get("name").and_then(Item::as_str);
        let url = table.get("url").and_then(Item::as_str);
        if let (Some(name), Some(url)) = (name, url) {
            urls.insert(name.to_string(), url.to_string());
        }
    };

    if let Some(tables) = index.as_array_of_tables() {
        for table in tables.iter() {
            insert(table);
        }
    } else if let Some(array) = index.as_array() {
        for value in array.iter() {
            if let Some(table) = value.as_inline_table() {
                insert(table);
            }
        }
    }
    urls
}

/// Package name → index name from `[tool.uv.sources]`.
fn uv_source_indexes(doc: &DocumentMut) -> HashMap<String, String> {
    let mut sources = HashMap::new();
    let Some(table) = get(doc.as_item(), &["tool", "uv", "sources"]).and_then(Item::as_table_like)
    else {
        return sources;
    };
    for (name, item) in table.iter() {
        if let Some(index) = item
            .as_table_like()
            .and_then(|t| t.get("index"))
            .and_then(Item::as_str)
        {
            sources.insert(name.to_lowercase(), index.to_string());
        }
    }
    sources
}

/// Package name (lower-cased) → the first extra listing it under
/// `[tool.poetry.extras]`.
pub(crate) fn poetry_extras_index(poetry: &dyn TableLike) -> HashMap<String, String> {
    let mut index = HashMap::new();
    let Some(extras) = poetry.get("extras").and_then(Item::as_table_like) else {
        return index;
    };
    for (extra, item) in extras.iter() {
        let Some(members) = item.as_array() else {
            continue;
        };
        for member in members.iter() {
            if let Some(name) = member.as_str() {
                index
                    .entry(name.to_lowercase())
                    .or_insert_with(|| extra.to_string());
            }
        }
    }
    index
}

/// Strips a trailing `#` comment; the marker must start the line or follow
/// whitespace so URL fragments (`#egg=`) survive.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #") {
        Some(idx) => &line[..idx],
        None => line,
    }
}
