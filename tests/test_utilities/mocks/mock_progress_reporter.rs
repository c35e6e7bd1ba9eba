use std::sync::Mutex;

use uv_prune::prelude::*;

/// Mock ProgressReporter for testing, collecting every message
#[derive(Default)]
pub struct MockProgressReporter {
    pub messages: Mutex<Vec<String>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.record(message);
    }

    fn report_debug(&self, message: &str) {
        self.record(message);
    }

    fn report_error(&self, message: &str) {
        self.record(message);
    }

    fn report_completion(&self, message: &str) {
        self.record(message);
    }

    fn begin_step(&self, message: &str) {
        self.record(message);
    }

    fn end_step(&self) {}
}
