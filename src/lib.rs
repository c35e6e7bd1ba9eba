//! uv-prune - Dependency pruning tool for Python projects
//!
//! This library reads a dependency manifest (requirements.txt, Poetry
//! pyproject.toml, or uv pyproject.toml), resolves the full transitive
//! dependency graph through the external `uv` resolver, prunes entries not
//! reachable from the declared dependency set, and re-emits the pruned
//! declarations in one of the supported manifest dialects. It follows
//! hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`pruning`): Pure dependency model and graph services
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use uv_prune::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let manifest_reader = FileSystemManifestReader::new();
//! let resolver = UvLockResolver::new();
//! let progress_reporter = StderrProgressReporter::new(false);
//!
//! // Create use case
//! let use_case = PruneDependenciesUseCase::new(manifest_reader, resolver, progress_reporter);
//!
//! // Execute
//! let request = PruneRequest::new(PathBuf::from("pyproject.toml"), None);
//! let response = use_case.execute(request)?;
//!
//! // Format output
//! let formatter = UvFormatter::new();
//! let output = formatter.format(&response.project)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod ports;
pub mod pruning;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemManifestReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{
        PoetryFormatter, RequirementsFormatter, UvFormatter,
    };
    pub use crate::adapters::outbound::process::UvLockResolver;
    pub use crate::application::config::PruneConfig;
    pub use crate::application::dto::{PruneRequest, PruneResponse};
    pub use crate::application::use_cases::PruneDependenciesUseCase;
    pub use crate::cli::OutputFormat;
    pub use crate::ports::outbound::{
        DependencyResolver, ManifestFormatter, ManifestReader, OutputPresenter, ProgressReporter,
    };
    pub use crate::pruning::domain::{
        DepKey, Dependency, DependencySource, ProjectDependencies, ResolvedGraph, ResolvedPackage,
        SourceFormat,
    };
    pub use crate::pruning::services::{correlate, DependencyPruner};
    pub use crate::shared::Result;
}
