mod prune_dependencies;

pub use prune_dependencies::PruneDependenciesUseCase;
