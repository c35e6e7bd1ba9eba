use std::collections::BTreeSet;
use std::fmt;

/// Where a dependency declaration points at.
///
/// One constructor per source kind; `Registry` is the default for plain
/// name/constraint declarations resolved against a package index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// Resolved against a package index by name and version constraint
    Registry,
    /// Pinned to a version-control locator (`git+https://...`), optionally at a revision
    VersionControl {
        location: String,
        rev: Option<String>,
    },
    /// A direct http(s) archive URL
    Url { location: String },
    /// A relative, absolute, or home-relative filesystem path
    LocalPath { location: String },
}

/// Composite identity of a dependency occurrence:
/// `(lower-cased name, groups, extras)`.
///
/// Two declarations of the same package under different group/extra
/// contexts are distinct graph nodes and may be retained or pruned
/// independently. Groups and extras are case-sensitive unordered sets;
/// `BTreeSet` keeps the key hashable and iteration deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepKey {
    name: String,
    groups: BTreeSet<String>,
    extras: BTreeSet<String>,
}

impl DepKey {
    pub fn new(name: &str, groups: BTreeSet<String>, extras: BTreeSet<String>) -> Self {
        Self {
            name: name.to_lowercase(),
            groups,
            extras,
        }
    }

    /// A key with no group or extra context.
    pub fn bare(name: &str) -> Self {
        Self::new(name, BTreeSet::new(), BTreeSet::new())
    }

    /// A key for a section context carrying at most one group and one extra,
    /// as implied by the manifest section an entry came from.
    pub fn with_context(name: &str, group: Option<&str>, extra: Option<&str>) -> Self {
        Self::new(
            name,
            group.map(|g| BTreeSet::from([g.to_string()])).unwrap_or_default(),
            extra.map(|e| BTreeSet::from([e.to_string()])).unwrap_or_default(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    pub fn extras(&self) -> &BTreeSet<String> {
        &self.extras
    }

    /// True when the key carries no group or extra context.
    pub fn is_bare(&self) -> bool {
        self.groups.is_empty() && self.extras.is_empty()
    }
}

impl fmt::Display for DepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.groups.is_empty() {
            let groups: Vec<&str> = self.groups.iter().map(String::as_str).collect();
            write!(f, " (groups: {})", groups.join(", "))?;
        }
        if !self.extras.is_empty() {
            let extras: Vec<&str> = self.extras.iter().map(String::as_str).collect();
            write!(f, " (extras: {})", extras.join(", "))?;
        }
        Ok(())
    }
}

/// One declared requirement occurrence with its section context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Normalized (lower-cased) package identifier
    pub name: String,
    /// Declared version constraint (e.g. `>=1.2`), `None` when unconstrained
    pub constraint: Option<String>,
    /// Exact version adopted from the resolved lock, filled in after correlation
    pub pinned_version: Option<String>,
    /// Source kind of the declaration
    pub source: DependencySource,
    /// Alternate registry URL for this dependency, when declared
    pub custom_index: Option<String>,
    /// Dependency-group names this declaration belongs to
    pub groups: BTreeSet<String>,
    /// Optional-extra names this declaration belongs to
    pub extras: BTreeSet<String>,
    /// Environment marker expression, preserved verbatim, never evaluated
    pub marker: Option<String>,
    /// Extras this dependency requests of its own dependencies (`pkg[socks]`)
    pub required_extras: BTreeSet<String>,
    /// The original declaration text, retained for display
    pub raw: String,
}

impl Dependency {
    /// An unconstrained registry dependency with no context.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            constraint: None,
            pinned_version: None,
            source: DependencySource::Registry,
            custom_index: None,
            groups: BTreeSet::new(),
            extras: BTreeSet::new(),
            marker: None,
            required_extras: BTreeSet::new(),
            raw: name.to_string(),
        }
    }

    /// The graph node identity of this declaration.
    ///
    /// Pure; equality and hashing of graph nodes are defined solely on
    /// the `(name, groups, extras)` triple.
    pub fn key(&self) -> DepKey {
        DepKey::new(&self.name, self.groups.clone(), self.extras.clone())
    }

    /// Renders the declaration as a PEP 508-style requirement string,
    /// suitable for the resolver's temporary project.
    pub fn to_requirement_string(&self) -> String {
        let mut req = self.name_with_extras();
        match &self.source {
            DependencySource::Registry => {
                if let Some(constraint) = &self.constraint {
                    req.push_str(constraint);
                }
            }
            DependencySource::VersionControl { location, rev } => {
                req.push_str(" @ ");
                req.push_str(location);
                if let Some(rev) = rev {
                    req.push('@');
                    req.push_str(rev);
                }
            }
            DependencySource::Url { location } | DependencySource::LocalPath { location } => {
                req.push_str(" @ ");
                req.push_str(location);
            }
        }
        if let Some(marker) = &self.marker {
            req.push_str("; ");
            req.push_str(marker);
        }
        req
    }

    /// Like [`to_requirement_string`](Self::to_requirement_string), but pins
    /// registry dependencies to the locked version when one is known.
    pub fn to_pinned_string(&self) -> String {
        match (&self.source, &self.pinned_version) {
            (DependencySource::Registry, Some(pin)) => {
                let mut req = self.name_with_extras();
                req.push_str("==");
                req.push_str(pin);
                if let Some(marker) = &self.marker {
                    req.push_str("; ");
                    req.push_str(marker);
                }
                req
            }
            _ => self.to_requirement_string(),
        }
    }

    fn name_with_extras(&self) -> String {
        if self.required_extras.is_empty() {
            self.name.clone()
        } else {
            let extras: Vec<&str> = self.required_extras.iter().map(String::as_str).collect();
            format!("{}[{}]", self.name, extras.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_key_lowercases_name() {
        let mut dep = Dependency::new("Torch");
        dep.name = "Torch".to_string();
        assert_eq!(dep.key().name(), "torch");
    }

    #[test]
    fn test_key_distinguishes_group_contexts() {
        let plain = Dependency::new("x");
        let mut dev = Dependency::new("x");
        dev.groups = groups(&["dev"]);

        assert_ne!(plain.key(), dev.key());
    }

    #[test]
    fn test_key_ignores_group_order() {
        let a = DepKey::new("x", groups(&["a", "b"]), BTreeSet::new());
        let b = DepKey::new("x", groups(&["b", "a"]), BTreeSet::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_display_includes_contexts() {
        let key = DepKey::new("x", groups(&["dev"]), groups(&["gpu"]));
        assert_eq!(format!("{}", key), "x (groups: dev) (extras: gpu)");
        assert_eq!(format!("{}", DepKey::bare("x")), "x");
    }

    #[test]
    fn test_requirement_string_registry() {
        let mut dep = Dependency::new("requests");
        dep.constraint = Some(">=2.0".to_string());
        assert_eq!(dep.to_requirement_string(), "requests>=2.0");
    }

    #[test]
    fn test_requirement_string_with_extras_and_marker() {
        let mut dep = Dependency::new("requests");
        dep.constraint = Some(">=2.0".to_string());
        dep.required_extras = groups(&["socks"]);
        dep.marker = Some("python_version >= '3.8'".to_string());
        assert_eq!(
            dep.to_requirement_string(),
            "requests[socks]>=2.0; python_version >= '3.8'"
        );
    }

    #[test]
    fn test_requirement_string_vcs_with_rev() {
        let mut dep = Dependency::new("mypkg");
        dep.source = DependencySource::VersionControl {
            location: "git+https://github.com/org/mypkg.git".to_string(),
            rev: Some("v1.2".to_string()),
        };
        assert_eq!(
            dep.to_requirement_string(),
            "mypkg @ git+https://github.com/org/mypkg.git@v1.2"
        );
    }

    #[test]
    fn test_pinned_string_prefers_lock_version() {
        let mut dep = Dependency::new("requests");
        dep.constraint = Some(">=2.0".to_string());
        dep.pinned_version = Some("2.32.3".to_string());
        assert_eq!(dep.to_pinned_string(), "requests==2.32.3");
    }

    #[test]
    fn test_pinned_string_falls_back_to_declared_form() {
        let mut dep = Dependency::new("requests");
        dep.constraint = Some(">=2.0".to_string());
        assert_eq!(dep.to_pinned_string(), "requests>=2.0");

        let mut url_dep = Dependency::new("pkg");
        url_dep.source = DependencySource::Url {
            location: "https://x/y.whl".to_string(),
        };
        url_dep.pinned_version = Some("1.0".to_string());
        assert_eq!(url_dep.to_pinned_string(), "pkg @ https://x/y.whl");
    }
}
