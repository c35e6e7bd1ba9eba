use std::collections::{BTreeMap, HashSet};

use toml_edit::{value, Array, DocumentMut, Item, Table};

use crate::ports::outbound::ManifestFormatter;
use crate::pruning::domain::{DepKey, Dependency, ProjectDependencies};
use crate::pruning::services::keeps;
use crate::shared::Result;

/// UvFormatter adapter emitting a uv-style pyproject.toml
///
/// Filters the original document's dependency arrays in place against the
/// retained key set, leaving every other table and the document layout
/// untouched. Projects that did not originate from a uv manifest get a
/// minimal synthesized document instead.
pub struct UvFormatter;

impl UvFormatter {
    pub fn new() -> Self {
        Self
    }

    fn filter_document(doc: &mut DocumentMut, kept: &HashSet<DepKey>) {
        if let Some(deps) = doc
            .get_mut("project")
            .and_then(Item::as_table_like_mut)
            .and_then(|t| t.get_mut("dependencies"))
            .and_then(Item::as_array_mut)
        {
            filter_array(deps, None, None, kept);
        }

        if let Some(optional) = doc
            .get_mut("project")
            .and_then(Item::as_table_like_mut)
            .and_then(|t| t.get_mut("optional-dependencies"))
            .and_then(Item::as_table_like_mut)
        {
            let extras: Vec<String> = optional.iter().map(|(key, _)| key.to_string()).collect();
            for extra in extras {
                if let Some(entries) = optional.get_mut(&extra).and_then(Item::as_array_mut) {
                    filter_array(entries, None, Some(&extra), kept);
                }
            }
        }

        if let Some(groups) = doc
            .get_mut("dependency-groups")
            .and_then(Item::as_table_like_mut)
        {
            let names: Vec<String> = groups.iter().map(|(key, _)| key.to_string()).collect();
            for group in names {
                if let Some(entries) = groups.get_mut(&group).and_then(Item::as_array_mut) {
                    filter_array(entries, Some(&group), None, kept);
                }
            }
        }

        // A converted project must not carry its old poetry table along.
        if let Some(tool) = doc.get_mut("tool").and_then(Item::as_table_mut) {
            tool.remove("poetry");
        }
    }

    /// Builds a minimal uv document for projects that originated from
    /// another dialect (e.g. requirements.txt), in declaration order.
    fn synthesize(project: &ProjectDependencies) -> String {
        let mut doc = DocumentMut::new();

        let mut table = Table::new();
        table["name"] = value("pruned-project");
        table["version"] = value("0.1.0");
        if let Some(py_version) = &project.py_version {
            table["requires-python"] = value(py_version.as_str());
        }

        let mut main = Array::new();
        let mut extras: BTreeMap<String, Array> = BTreeMap::new();
        let mut groups: BTreeMap<String, Array> = BTreeMap::new();

        for dep in &project.direct {
            let rendered = dep.to_requirement_string();
            if let Some(group) = dep.groups.iter().next() {
                groups.entry(group.clone()).or_default().push(rendered);
            } else if let Some(extra) = dep.extras.iter().next() {
                extras.entry(extra.clone()).or_default().push(rendered);
            } else {
                main.push(rendered);
            }
        }

        table["dependencies"] = value(main);
        if !extras.is_empty() {
            let mut optional = Table::new();
            for (extra, entries) in extras {
                optional[&extra] = value(entries);
            }
            table["optional-dependencies"] = Item::Table(optional);
        }
        doc["project"] = Item::Table(table);

        if !groups.is_empty() {
            let mut section = Table::new();
            for (group, entries) in groups {
                section[&group] = value(entries);
            }
            doc["dependency-groups"] = Item::Table(section);
        }

        doc.to_string()
    }
}

impl Default for UvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestFormatter for UvFormatter {
    fn format(&self, project: &ProjectDependencies) -> Result<String> {
        let Some(source) = &project.uv_source else {
            return Ok(Self::synthesize(project));
        };

        let kept: HashSet<DepKey> = project.direct.iter().map(Dependency::key).collect();
        let mut doc = source.clone();
        Self::filter_document(&mut doc, &kept);
        Ok(doc.to_string())
    }
}

/// Retains string entries the section filter keeps; non-string entries
/// (e.g. `{include-group = "..."}`) always pass through.
fn filter_array(
    entries: &mut Array,
    group: Option<&str>,
    extra: Option<&str>,
    kept: &HashSet<DepKey>,
) {
    entries.retain(|entry| match entry.as_str() {
        Some(raw) => keeps(raw, group, extra, kept),
        None => true,
    });
}
