/// Formatter adapters - re-serialize pruned dependencies per dialect
mod poetry_formatter;
mod requirements_formatter;
mod uv_formatter;

pub use poetry_formatter::PoetryFormatter;
pub use requirements_formatter::RequirementsFormatter;
pub use uv_formatter::UvFormatter;
