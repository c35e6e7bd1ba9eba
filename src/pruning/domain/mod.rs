pub mod dependency;
pub mod project;
pub mod resolved;

pub use dependency::{DepKey, Dependency, DependencySource};
pub use project::{detect_source_format, ProjectDependencies, SourceFormat};
pub use resolved::{ResolvedGraph, ResolvedPackage};
