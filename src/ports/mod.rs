/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports (driven ports) abstract the infrastructure the
/// application core depends on: the file system, the external resolver
/// process, the terminal, and the output destination.
pub mod outbound;
