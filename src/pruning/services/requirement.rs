use std::collections::BTreeSet;

use toml_edit::TableLike;

use crate::pruning::domain::{Dependency, DependencySource};
use crate::shared::{PruneError, Result};

/// Version comparison operators in match-priority order.
///
/// A registry declaration is split at the first operator found by scanning
/// this list in order; the list order (not string position) governs
/// precedence when operators textually overlap (`!=` vs `<=`).
const VERSION_OPERATORS: [&str; 7] = ["==", ">=", "<=", ">", "<", "~=", "!="];

/// Archive suffixes that mark a bare string as a local-path declaration.
const ARCHIVE_SUFFIXES: [&str; 2] = [".tar.gz", ".whl"];

/// Converts one raw declaration string into a [`Dependency`].
///
/// Dispatch order, first match wins: VCS locator, URL, local path,
/// registry. Any non-registry form without an `@` separator is a parse
/// error. An empty string yields `Ok(None)`; the caller skips it.
///
/// Group/extra/marker context and custom indexes are attached by the
/// caller from the section the entry came from, never inferred here.
pub fn parse_requirement(raw: &str) -> Result<Option<Dependency>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        eprintln!("⚠️  Warning: skipping empty dependency declaration");
        return Ok(None);
    }

    // The marker is an opaque environment condition after the first ';'.
    let (spec, marker) = match trimmed.split_once(';') {
        Some((head, tail)) => (head.trim(), Some(tail.trim().to_string())),
        None => (trimmed, None),
    };

    let separator = spec.split_once('@');

    let mut dep = if spec.contains("git+") {
        parse_vcs(spec, separator)?
    } else if spec.contains("http://") || spec.contains("https://") {
        parse_url(spec, separator)?
    } else if is_path_form(spec, separator) {
        parse_path(spec, separator)?
    } else {
        parse_registry(spec)?
    };

    dep.marker = marker;
    dep.raw = trimmed.to_string();
    Ok(Some(dep))
}

/// Converts a poetry-style structured declaration into a [`Dependency`].
///
/// The keys `version`, `git` (+`rev`/`branch`/`tag`), `url`, and `path`
/// select the source kind; absence of all of them means an unconstrained
/// registry dependency.
pub fn parse_requirement_table(name: &str, table: &dyn TableLike) -> Result<Dependency> {
    let mut dep = Dependency::new(name);

    if let Some(git) = table.get("git").and_then(|v| v.as_str()) {
        let location = if git.starts_with("git+") {
            git.to_string()
        } else {
            format!("git+{git}")
        };
        let rev = ["rev", "branch", "tag"]
            .iter()
            .find_map(|key| table.get(key).and_then(|v| v.as_str()))
            .map(str::to_string);
        dep.source = DependencySource::VersionControl { location, rev };
    } else if let Some(url) = table.get("url").and_then(|v| v.as_str()) {
        dep.source = DependencySource::Url {
            location: url.to_string(),
        };
    } else if let Some(path) = table.get("path").and_then(|v| v.as_str()) {
        dep.source = DependencySource::LocalPath {
            location: path.to_string(),
        };
    } else if let Some(version) = table.get("version").and_then(|v| v.as_str()) {
        dep.constraint = normalize_constraint(version);
    }

    if let Some(extras) = table.get("extras").and_then(|v| v.as_array()) {
        dep.required_extras = extras
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect();
    }

    if let Some(markers) = table.get("markers").and_then(|v| v.as_str()) {
        dep.marker = Some(markers.to_string());
    }

    dep.raw = dep.to_requirement_string();
    Ok(dep)
}

/// Translates a poetry version constraint into its PEP 508 equivalent.
///
/// `^1.2.3` becomes `>=1.2.3,<2.0.0`, `~1.2.3` becomes `>=1.2.3,<1.3.0`,
/// a bare version is an exact pin, `*` is unconstrained. Constraints that
/// already use comparison operators pass through unchanged.
pub fn poetry_constraint_to_pep508(constraint: &str) -> Option<String> {
    let c = constraint.trim();
    if c.is_empty() || c == "*" {
        return None;
    }

    if let Some(version) = c.strip_prefix('^') {
        if let Some(upper) = caret_upper_bound(version) {
            return Some(format!(">={version},<{upper}"));
        }
        return Some(c.to_string());
    }

    if let Some(version) = c.strip_prefix('~') {
        // `~=` is already a PEP 440 operator, only bare `~` is poetry-specific
        if let Some(version) = version.strip_prefix('=') {
            return Some(format!("~={version}"));
        }
        if let Some(upper) = tilde_upper_bound(version) {
            return Some(format!(">={version},<{upper}"));
        }
        return Some(c.to_string());
    }

    if c.starts_with(|ch: char| ch.is_ascii_digit()) {
        return Some(format!("=={c}"));
    }

    Some(c.to_string())
}

fn numeric_parts(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

fn caret_upper_bound(version: &str) -> Option<String> {
    let mut parts = numeric_parts(version)?;
    let bump_at = parts.iter().position(|&p| p != 0).unwrap_or(parts.len() - 1);
    parts[bump_at] += 1;
    for part in parts.iter_mut().skip(bump_at + 1) {
        *part = 0;
    }
    Some(join_parts(&parts))
}

fn tilde_upper_bound(version: &str) -> Option<String> {
    let mut parts = numeric_parts(version)?;
    if parts.len() >= 2 {
        parts.truncate(2);
        parts[1] += 1;
    } else {
        parts[0] += 1;
    }
    Some(join_parts(&parts))
}

fn join_parts(parts: &[u64]) -> String {
    parts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn normalize_constraint(version: &str) -> Option<String> {
    poetry_constraint_to_pep508(version)
}

fn missing_separator(spec: &str) -> PruneError {
    PruneError::parse(format!(
        "missing '@' separator in non-registry declaration '{spec}'"
    ))
}

fn parse_vcs(spec: &str, separator: Option<(&str, &str)>) -> Result<Dependency> {
    let (name_part, locator) = separator.ok_or_else(|| missing_separator(spec))?;
    let locator = locator.trim();

    // An explicit `#egg=name` fragment overrides the declared name.
    let (base, fragment) = match locator.split_once('#') {
        Some((base, fragment)) => (base.trim(), Some(fragment)),
        None => (locator, None),
    };

    let egg_name = fragment
        .and_then(|f| f.strip_prefix("egg="))
        .map(|rest| rest.split('&').next().unwrap_or(rest));

    let (location, rev) = match base.rsplit_once('@') {
        Some((head, tail)) if !tail.contains('/') && head.contains("://") => {
            (head.to_string(), Some(tail.to_string()))
        }
        _ => (base.to_string(), None),
    };

    let (declared_name, required_extras) = parse_name_and_extras(name_part)?;
    let mut dep = Dependency::new(egg_name.unwrap_or(&declared_name));
    dep.required_extras = required_extras;
    dep.source = DependencySource::VersionControl { location, rev };
    Ok(dep)
}

fn parse_url(spec: &str, separator: Option<(&str, &str)>) -> Result<Dependency> {
    let (name_part, locator) = separator.ok_or_else(|| missing_separator(spec))?;
    let (name, required_extras) = parse_name_and_extras(name_part)?;
    let mut dep = Dependency::new(&name);
    dep.required_extras = required_extras;
    dep.source = DependencySource::Url {
        location: locator.trim().to_string(),
    };
    Ok(dep)
}

fn is_path_form(spec: &str, separator: Option<(&str, &str)>) -> bool {
    let candidate = match separator {
        Some((_, locator)) => locator.trim(),
        None => spec,
    };
    candidate.starts_with("./")
        || candidate.starts_with("../")
        || candidate.starts_with('/')
        || candidate.starts_with("~/")
        || ARCHIVE_SUFFIXES.iter().any(|ext| candidate.ends_with(ext))
}

fn parse_path(spec: &str, separator: Option<(&str, &str)>) -> Result<Dependency> {
    let (name_part, locator) = separator.ok_or_else(|| missing_separator(spec))?;
    let (name, required_extras) = parse_name_and_extras(name_part)?;
    let mut dep = Dependency::new(&name);
    dep.required_extras = required_extras;
    dep.source = DependencySource::LocalPath {
        location: locator.trim().to_string(),
    };
    Ok(dep)
}

fn parse_registry(spec: &str) -> Result<Dependency> {
    // Split at the first operator found by scanning the fixed list in
    // priority order; no operator means an unconstrained dependency.
    let split = VERSION_OPERATORS
        .iter()
        .find_map(|op| spec.find(op).map(|idx| (idx, *op)));

    let (name_part, constraint) = match split {
        Some((idx, _)) => (&spec[..idx], Some(spec[idx..].trim().to_string())),
        None => (spec, None),
    };

    let (name, required_extras) = parse_name_and_extras(name_part)?;
    let mut dep = Dependency::new(&name);
    dep.required_extras = required_extras;
    dep.constraint = constraint;
    Ok(dep)
}

fn parse_name_and_extras(name_part: &str) -> Result<(String, BTreeSet<String>)> {
    let name_part = name_part.trim();

    let (name, extras) = match name_part.split_once('[') {
        Some((name, rest)) => {
            let extras_spec = rest.strip_suffix(']').ok_or_else(|| {
                PruneError::parse(format!("unterminated extras in '{name_part}'"))
            })?;
            let extras = extras_spec
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
            (name.trim(), extras)
        }
        None => (name_part, BTreeSet::new()),
    };

    if name.is_empty() {
        return Err(PruneError::parse(format!(
            "missing package name in declaration '{name_part}'"
        ))
        .into());
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(PruneError::parse(format!(
            "invalid package name '{name}': only alphanumeric characters, hyphens, underscores, and dots are allowed"
        ))
        .into());
    }

    Ok((name.to_lowercase(), extras))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> Dependency {
        parse_requirement(raw).unwrap().unwrap()
    }

    #[test]
    fn test_empty_string_is_absent_not_error() {
        assert!(parse_requirement("").unwrap().is_none());
        assert!(parse_requirement("   ").unwrap().is_none());
    }

    #[test]
    fn test_registry_unconstrained() {
        let dep = parsed("requests");
        assert_eq!(dep.name, "requests");
        assert_eq!(dep.constraint, None);
        assert_eq!(dep.source, DependencySource::Registry);
    }

    #[test]
    fn test_registry_splits_at_first_operator_in_priority_order() {
        let dep = parsed("pkg!=1.0");
        assert_eq!(dep.name, "pkg");
        assert_eq!(dep.constraint.as_deref(), Some("!=1.0"));

        // `>=` wins over the later `!=` because it appears in the string
        let dep = parsed("pkg>=1.0,!=1.5");
        assert_eq!(dep.constraint.as_deref(), Some(">=1.0,!=1.5"));

        let dep = parsed("pkg~=2.1");
        assert_eq!(dep.constraint.as_deref(), Some("~=2.1"));
    }

    #[test]
    fn test_registry_extras_and_marker() {
        let dep = parsed("requests[socks,security]>=2.0; python_version >= '3.8'");
        assert_eq!(dep.name, "requests");
        assert_eq!(dep.constraint.as_deref(), Some(">=2.0"));
        assert!(dep.required_extras.contains("socks"));
        assert!(dep.required_extras.contains("security"));
        assert_eq!(dep.marker.as_deref(), Some("python_version >= '3.8'"));
    }

    #[test]
    fn test_url_form() {
        let dep = parsed("name @ https://x/y.whl");
        assert_eq!(dep.name, "name");
        assert_eq!(dep.constraint, None);
        assert_eq!(
            dep.source,
            DependencySource::Url {
                location: "https://x/y.whl".to_string()
            }
        );
        assert_eq!(dep.raw, "name @ https://x/y.whl");
    }

    #[test]
    fn test_url_form_without_separator_fails() {
        assert!(parse_requirement("https://x/y.whl").is_err());
    }

    #[test]
    fn test_vcs_form_with_rev() {
        let dep = parsed("mypkg @ git+https://github.com/org/mypkg.git@v1.2");
        assert_eq!(dep.name, "mypkg");
        assert_eq!(
            dep.source,
            DependencySource::VersionControl {
                location: "git+https://github.com/org/mypkg.git".to_string(),
                rev: Some("v1.2".to_string()),
            }
        );
    }

    #[test]
    fn test_vcs_egg_fragment_overrides_name() {
        let dep = parsed("alias @ git+https://github.com/org/repo.git@main#egg=realname");
        assert_eq!(dep.name, "realname");
    }

    #[test]
    fn test_vcs_form_without_separator_fails() {
        assert!(parse_requirement("git+https://github.com/org/repo.git").is_err());
    }

    #[test]
    fn test_path_form() {
        let dep = parsed("local @ ./pkgs/local");
        assert_eq!(
            dep.source,
            DependencySource::LocalPath {
                location: "./pkgs/local".to_string()
            }
        );

        let dep = parsed("wheel @ /abs/path/wheel-1.0.whl");
        assert!(matches!(dep.source, DependencySource::LocalPath { .. }));
    }

    #[test]
    fn test_bare_archive_without_separator_fails() {
        assert!(parse_requirement("./dist/pkg-1.0.tar.gz").is_err());
        assert!(parse_requirement("pkg-1.0.whl").is_err());
    }

    #[test]
    fn test_name_is_lowercased() {
        assert_eq!(parsed("Django>=4.0").name, "django");
    }

    #[test]
    fn test_table_form_version() {
        let doc: toml_edit::DocumentMut = r#"dep = { version = "^1.2.3" }"#.parse().unwrap();
        let table = doc["dep"].as_table_like().unwrap();
        let dep = parse_requirement_table("dep", table).unwrap();
        assert_eq!(dep.constraint.as_deref(), Some(">=1.2.3,<2.0.0"));
        assert_eq!(dep.source, DependencySource::Registry);
    }

    #[test]
    fn test_table_form_git() {
        let doc: toml_edit::DocumentMut =
            r#"dep = { git = "https://github.com/org/repo.git", rev = "abc123" }"#
                .parse()
                .unwrap();
        let table = doc["dep"].as_table_like().unwrap();
        let dep = parse_requirement_table("dep", table).unwrap();
        assert_eq!(
            dep.source,
            DependencySource::VersionControl {
                location: "git+https://github.com/org/repo.git".to_string(),
                rev: Some("abc123".to_string()),
            }
        );
    }

    #[test]
    fn test_table_form_defaults_to_registry() {
        let doc: toml_edit::DocumentMut = r#"dep = { extras = ["cli"], markers = "os_name == 'posix'" }"#
            .parse()
            .unwrap();
        let table = doc["dep"].as_table_like().unwrap();
        let dep = parse_requirement_table("dep", table).unwrap();
        assert_eq!(dep.source, DependencySource::Registry);
        assert_eq!(dep.constraint, None);
        assert!(dep.required_extras.contains("cli"));
        assert_eq!(dep.marker.as_deref(), Some("os_name == 'posix'"));
    }

    #[test]
    fn test_poetry_constraint_translation() {
        assert_eq!(poetry_constraint_to_pep508("*"), None);
        assert_eq!(
            poetry_constraint_to_pep508("^1.2.3").as_deref(),
            Some(">=1.2.3,<2.0.0")
        );
        assert_eq!(
            poetry_constraint_to_pep508("^0.2.3").as_deref(),
            Some(">=0.2.3,<0.3.0")
        );
        assert_eq!(
            poetry_constraint_to_pep508("~1.2.3").as_deref(),
            Some(">=1.2.3,<1.3")
        );
        assert_eq!(
            poetry_constraint_to_pep508("~1").as_deref(),
            Some(">=1,<2")
        );
        assert_eq!(poetry_constraint_to_pep508("1.2.3").as_deref(), Some("==1.2.3"));
        assert_eq!(
            poetry_constraint_to_pep508(">=2,<3").as_deref(),
            Some(">=2,<3")
        );
    }
}
