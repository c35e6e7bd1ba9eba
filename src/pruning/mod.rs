/// Dependency pruning bounded context
///
/// Contains the pure domain model (dependency declarations, keyed graph,
/// resolved lock data) and the domain services that operate on it
/// (requirement extraction, lock correlation, pruning, section filtering).
pub mod domain;
pub mod services;
