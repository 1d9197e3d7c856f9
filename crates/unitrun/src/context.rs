//! Run context handed to every test body
//!
//! Holds the reporter for the run, the name of the executing suite and the
//! record of the executing test. Methods take `&self` so that assertions and
//! [`TimeConstraint`](crate::TimeConstraint) guards can use the context at
//! the same time.

use crate::failure::Failure;
use crate::reporter::Reporter;
use crate::suite::{Suite, DEFAULT_SUITE};
use crate::test::Test;
use std::cell::RefCell;
use std::time::Duration;

pub struct TestContext<'r> {
    reporter: RefCell<&'r mut dyn Reporter>,
    suite: RefCell<String>,
    current: RefCell<Option<Test>>,
}

impl<'r> TestContext<'r> {
    pub fn new(reporter: &'r mut dyn Reporter) -> Self {
        Self {
            reporter: RefCell::new(reporter),
            suite: RefCell::new(DEFAULT_SUITE.to_string()),
            current: RefCell::new(None),
        }
    }

    /// Record a failure at `file`/`line`.
    ///
    /// Counts against the executing test, if any, and is always forwarded
    /// to the reporter.
    pub fn report_failure(&self, file: &str, line: u32, message: impl Into<String>) {
        if let Some(test) = self.current.borrow_mut().as_mut() {
            test.failure();
        }
        let failure = Failure::new(file, line, message);
        tracing::debug!(
            file = %failure.filename,
            line = failure.line,
            message = %failure.message,
            "failure reported"
        );
        self.reporter.borrow_mut().report_failure(&failure);
    }

    /// Exempt the executing test from the global time constraint
    pub fn no_time_constraint(&self) {
        if let Some(test) = self.current.borrow_mut().as_mut() {
            test.no_time_constraint();
        }
    }

    /// Failures recorded so far by the executing test (0 outside a test)
    pub fn failure_count(&self) -> u32 {
        self.current
            .borrow()
            .as_ref()
            .map_or(0, Test::failure_count)
    }

    pub fn suite_name(&self) -> String {
        self.suite.borrow().clone()
    }

    pub fn current_test_name(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|t| t.name().to_string())
    }

    pub fn is_test_running(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub(crate) fn enter_suite(&self, suite: &Suite) {
        *self.suite.borrow_mut() = suite.name().to_string();
        self.reporter.borrow_mut().suite_start(suite);
    }

    pub(crate) fn leave_suite(&self, suite: &Suite) -> u32 {
        self.reporter.borrow_mut().suite_finish(suite)
    }

    pub(crate) fn begin_test(&self, test: Test) {
        *self.current.borrow_mut() = Some(test);
    }

    /// Clear the current test, returning its final record
    pub(crate) fn end_test(&self) -> Option<Test> {
        self.current.borrow_mut().take()
    }

    pub(crate) fn notify_test_start(&self) {
        if let Some(test) = self.current.borrow().as_ref() {
            self.reporter.borrow_mut().test_start(test);
        }
    }

    pub(crate) fn notify_test_finish(&self) {
        if let Some(test) = self.current.borrow().as_ref() {
            self.reporter.borrow_mut().test_finish(test);
        }
    }

    /// Snapshot of the current test record
    pub(crate) fn current_test(&self) -> Option<Test> {
        self.current.borrow().clone()
    }

    pub(crate) fn record_elapsed(&self, elapsed: Duration) {
        // May run while unwinding; never panic on a held borrow
        if let Ok(mut current) = self.current.try_borrow_mut() {
            if let Some(test) = current.as_mut() {
                test.set_elapsed(elapsed);
            }
        }
    }
}
