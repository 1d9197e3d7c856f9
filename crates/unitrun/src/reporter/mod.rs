//! Reporters: observers of run events that turn them into output
//!
//! Every reporter keeps the same [`Counters`] through the provided trait
//! methods; variants override the events they render and call back into
//! the counter bookkeeping.

mod console;
mod deferred;
mod json;
mod trace;
mod xml;

pub use console::ConsoleReporter;
pub use deferred::{DeferredReporter, TestRecord};
pub use json::JsonReporter;
pub use trace::TraceReporter;
pub use xml::XmlReporter;

use crate::error::{RunError, RunResult};
use crate::failure::Failure;
use crate::suite::{Suite, DEFAULT_SUITE};
use crate::test::Test;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, OnceLock, TryLockError};
use std::time::Duration;

/// Per-suite and per-run tallies shared by all reporters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub suite_tests: u32,
    pub suite_failed: u32,
    pub suite_failures: u32,
    pub suite_time: Duration,
    pub total_tests: u32,
    pub total_failed: u32,
    pub total_failures: u32,
    pub total_time: Duration,
    pub suites: u32,
}

impl Counters {
    pub fn suite_start(&mut self) {
        self.suites += 1;
        self.suite_tests = 0;
        self.suite_failed = 0;
        self.suite_failures = 0;
        self.suite_time = Duration::ZERO;
    }

    pub fn test_start(&mut self) {
        self.suite_tests += 1;
        self.total_tests += 1;
    }

    pub fn test_finish(&mut self, test: &Test) {
        let failures = test.failure_count();
        if failures > 0 {
            self.suite_failed += 1;
            self.total_failed += 1;
            self.suite_failures += failures;
            self.total_failures += failures;
        }
        self.suite_time += test.elapsed();
        self.total_time += test.elapsed();
    }
}

/// Observer of run events.
///
/// Implementors only have to expose their [`Counters`]; the provided
/// methods do the bookkeeping. An override should still update the
/// counters, usually by calling the matching [`Counters`] method.
pub trait Reporter {
    fn counters(&self) -> &Counters;

    fn counters_mut(&mut self) -> &mut Counters;

    fn suite_start(&mut self, _suite: &Suite) {
        self.counters_mut().suite_start();
    }

    fn test_start(&mut self, _test: &Test) {
        self.counters_mut().test_start();
    }

    fn report_failure(&mut self, _failure: &Failure) {}

    fn test_finish(&mut self, test: &Test) {
        self.counters_mut().test_finish(test);
    }

    /// Close a suite, returning the number of failures it recorded
    fn suite_finish(&mut self, _suite: &Suite) -> u32 {
        self.counters().suite_failures
    }

    /// Close the run, returning the number of failed tests
    fn summary(&mut self) -> u32 {
        self.counters().total_failed
    }

    /// Reset all counters for a fresh run
    fn clear(&mut self) {
        *self.counters_mut() = Counters::default();
    }

    /// Toggle start/finish trace output; ignored by reporters without it
    fn set_trace(&mut self, _trace: bool) {}
}

/// A reporter that only counts
#[derive(Debug, Default)]
pub struct SilentReporter {
    counters: Counters,
}

impl Reporter for SilentReporter {
    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }
}

/// Names of the suite and test currently executing, as seen from events.
///
/// Reporters that print failures as they arrive use this to say where the
/// failure happened.
#[derive(Debug, Clone, Default)]
pub(crate) struct Position {
    suite: Option<String>,
    test: Option<String>,
}

impl Position {
    pub(crate) fn enter_suite(&mut self, suite: &Suite) {
        self.suite = Some(suite.name().to_string());
        self.test = None;
    }

    pub(crate) fn leave_suite(&mut self) {
        self.suite = None;
        self.test = None;
    }

    pub(crate) fn enter_test(&mut self, test: &Test) {
        self.test = Some(test.name().to_string());
    }

    pub(crate) fn leave_test(&mut self) {
        self.test = None;
    }

    /// Suite name, or `None` for the default suite
    pub(crate) fn named_suite(&self) -> Option<&str> {
        self.suite.as_deref().filter(|s| *s != DEFAULT_SUITE)
    }

    pub(crate) fn test(&self) -> Option<&str> {
        self.test.as_deref()
    }

    /// "Failure in suite S test T", leaving out the parts that are unknown
    pub(crate) fn failure_header(&self) -> String {
        let mut header = String::from("Failure");
        if self.named_suite().is_some() || self.test.is_some() {
            header.push_str(" in");
        }
        if let Some(suite) = self.named_suite() {
            header.push_str(" suite ");
            header.push_str(suite);
        }
        if let Some(test) = self.test() {
            header.push_str(" test ");
            header.push_str(test);
        }
        header
    }
}

static DEFAULT_REPORTER: OnceLock<Mutex<ConsoleReporter>> = OnceLock::new();

fn default_reporter_lock() -> &'static Mutex<ConsoleReporter> {
    DEFAULT_REPORTER.get_or_init(|| Mutex::new(ConsoleReporter::stdout()))
}

/// The process-wide console reporter used by the plain driver entry points.
///
/// Blocks while a run holds it, so do not call it from inside a test.
pub fn default_reporter() -> MutexGuard<'static, ConsoleReporter> {
    // A test panicking while the lock was held leaves usable counters behind
    default_reporter_lock()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Lock the default reporter for a run without waiting for it
pub(crate) fn try_default_reporter() -> RunResult<MutexGuard<'static, ConsoleReporter>> {
    match default_reporter_lock().try_lock() {
        Ok(guard) => Ok(guard),
        Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => Err(RunError::RunInProgress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn finished(name: &str, failures: u32, ms: u64) -> Test {
        let mut test = Test::new(name);
        for _ in 0..failures {
            test.failure();
        }
        test.set_elapsed(Duration::from_millis(ms));
        test
    }

    #[test]
    fn test_counters_track_suite_and_total() {
        let mut reporter = SilentReporter::default();
        let suite = Suite::new("Parsing");

        reporter.suite_start(&suite);
        for (name, failures) in [("a", 0), ("b", 2), ("c", 1)] {
            let test = finished(name, failures, 5);
            reporter.test_start(&test);
            reporter.test_finish(&test);
        }
        assert_eq!(reporter.suite_finish(&suite), 3);

        let counters = *reporter.counters();
        assert_eq!(counters.suite_tests, 3);
        assert_eq!(counters.suite_failed, 2);
        assert_eq!(counters.total_failures, 3);
        assert_eq!(counters.total_time, Duration::from_millis(15));
        assert_eq!(reporter.summary(), 2);
    }

    #[test]
    fn test_suite_start_resets_suite_counters_only() {
        let mut reporter = SilentReporter::default();
        reporter.suite_start(&Suite::new("One"));
        let test = finished("x", 1, 0);
        reporter.test_start(&test);
        reporter.test_finish(&test);
        reporter.suite_start(&Suite::new("Two"));

        let counters = reporter.counters();
        assert_eq!(counters.suite_failed, 0);
        assert_eq!(counters.total_failed, 1);
        assert_eq!(counters.suites, 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut reporter = SilentReporter::default();
        reporter.suite_start(&Suite::new("One"));
        reporter.clear();
        assert_eq!(*reporter.counters(), Counters::default());
    }

    #[test]
    fn test_failure_header() {
        let mut position = Position::default();
        assert_eq!(position.failure_header(), "Failure");

        position.enter_suite(&Suite::new(DEFAULT_SUITE));
        position.enter_test(&Test::new("lone"));
        assert_eq!(position.failure_header(), "Failure in test lone");

        position.enter_suite(&Suite::new("Earth"));
        position.enter_test(&Test::new("oceans"));
        assert_eq!(position.failure_header(), "Failure in suite Earth test oceans");
    }

    proptest! {
        #[test]
        fn prop_failed_never_exceeds_tests(failures in proptest::collection::vec(0u32..4, 0..40)) {
            let mut reporter = SilentReporter::default();
            reporter.suite_start(&Suite::new("Prop"));
            for (i, f) in failures.iter().enumerate() {
                let test = finished(&format!("t{}", i), *f, 1);
                reporter.test_start(&test);
                reporter.test_finish(&test);
            }
            let counters = *reporter.counters();
            let expected_failed = failures.iter().filter(|f| **f > 0).count() as u32;
            prop_assert_eq!(counters.total_tests, failures.len() as u32);
            prop_assert_eq!(counters.total_failed, expected_failed);
            prop_assert_eq!(counters.total_failures, failures.iter().sum::<u32>());
            prop_assert!(counters.total_failed <= counters.total_tests);
        }
    }
}
