use std::cell::RefCell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::ports::outbound::ProgressReporter;

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// This adapter implements the ProgressReporter port, writing progress
/// information to stderr so it doesn't interfere with stdout output.
/// Long-running steps show an indicatif spinner; debug messages appear
/// only in verbose mode.
pub struct StderrProgressReporter {
    verbose: bool,
    spinner: RefCell<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            spinner: RefCell::new(None),
        }
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn report_debug(&self, message: &str) {
        if self.verbose {
            eprintln!("{}", message.dimmed());
        }
    }

    fn report_error(&self, message: &str) {
        self.clear_spinner();
        eprintln!("{}", message.red());
    }

    fn report_completion(&self, message: &str) {
        self.clear_spinner();
        eprintln!("{}", message.green());
    }

    fn begin_step(&self, message: &str) {
        self.clear_spinner();
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Failed to set progress bar template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn end_step(&self) {
        self.clear_spinner();
    }
}
