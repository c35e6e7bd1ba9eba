/// ProgressReporter port for reporting progress during operations
///
/// This port abstracts progress reporting (e.g., to stderr)
/// to provide user feedback while the pipeline runs.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports a debug-level message, shown only in verbose mode
    fn report_debug(&self, message: &str);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);

    /// Marks the start of a long-running step (e.g. resolver invocation)
    fn begin_step(&self, message: &str);

    /// Marks the end of the current long-running step
    fn end_step(&self);
}
