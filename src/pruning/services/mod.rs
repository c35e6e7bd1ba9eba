mod correlator;
mod pruner;
mod requirement;
mod section_filter;

pub use correlator::{correlate, CorrelatedGraph};
pub use pruner::DependencyPruner;
pub use requirement::{parse_requirement, parse_requirement_table, poetry_constraint_to_pep508};
pub use section_filter::{keeps, requirement_name};
