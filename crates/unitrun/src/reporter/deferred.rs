//! Deferred reporter - collects results for rendering after the run

use super::{Counters, Reporter};
use crate::failure::Failure;
use crate::suite::Suite;
use crate::test::Test;
use serde::Serialize;

/// One collected entry.
///
/// A suite start produces a marker entry with `test == None`; every test
/// start produces an entry named after the test. Failures reported while a
/// test runs attach to that test. Failures reported between tests, such as
/// a fixture that cannot be set up or torn down, attach to the suite marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    pub suite: String,
    pub test: Option<String>,
    pub time_ms: u64,
    /// Failure count of the finished test as the counters saw it
    pub failure_count: u32,
    pub failures: Vec<Failure>,
}

impl TestRecord {
    fn suite_marker(suite: &str) -> Self {
        Self {
            suite: suite.to_string(),
            test: None,
            time_ms: 0,
            failure_count: 0,
            failures: Vec::new(),
        }
    }

    fn test(suite: &str, test: &str) -> Self {
        Self {
            suite: suite.to_string(),
            test: Some(test.to_string()),
            time_ms: 0,
            failure_count: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_suite_marker(&self) -> bool {
        self.test.is_none()
    }

    /// A test passed when it finished without counted failures
    pub fn passed(&self) -> bool {
        self.failure_count == 0
    }
}

#[derive(Debug, Default)]
pub struct DeferredReporter {
    counters: Counters,
    records: Vec<TestRecord>,
    suite: String,
    /// Index of the current suite marker
    marker: Option<usize>,
    in_test: bool,
}

impl DeferredReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }
}

impl Reporter for DeferredReporter {
    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    fn suite_start(&mut self, suite: &Suite) {
        self.counters.suite_start();
        self.suite = suite.name().to_string();
        self.marker = Some(self.records.len());
        self.in_test = false;
        self.records.push(TestRecord::suite_marker(suite.name()));
    }

    fn test_start(&mut self, test: &Test) {
        self.counters.test_start();
        self.in_test = true;
        self.records.push(TestRecord::test(&self.suite, test.name()));
    }

    fn report_failure(&mut self, failure: &Failure) {
        let target = if self.in_test {
            self.records.last_mut()
        } else {
            self.marker.and_then(|index| self.records.get_mut(index))
        };
        debug_assert!(target.is_some(), "failure reported before any suite started");
        match target {
            Some(record) => record.failures.push(failure.clone()),
            None => tracing::warn!(%failure, "dropping failure reported outside a run"),
        }
    }

    fn test_finish(&mut self, test: &Test) {
        self.counters.test_finish(test);
        if self.in_test {
            if let Some(record) = self.records.last_mut() {
                record.time_ms = test.elapsed_ms();
                record.failure_count = test.failure_count();
            }
        }
        self.in_test = false;
    }

    fn clear(&mut self) {
        self.counters = Counters::default();
        self.records.clear();
        self.suite.clear();
        self.marker = None;
        self.in_test = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_records_marker_then_tests() {
        let mut reporter = DeferredReporter::new();
        reporter.suite_start(&Suite::new("Jupiter"));

        let mut storm = Test::new("storm");
        reporter.test_start(&storm);
        reporter.report_failure(&Failure::new("j.rs", 8, "too big"));
        storm.failure();
        storm.set_elapsed(Duration::from_millis(12));
        reporter.test_finish(&storm);

        let records = reporter.records();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_suite_marker());
        assert_eq!(records[0].suite, "Jupiter");
        assert_eq!(records[1].test.as_deref(), Some("storm"));
        assert_eq!(records[1].suite, "Jupiter");
        assert_eq!(records[1].time_ms, 12);
        assert_eq!(records[1].failures, vec![Failure::new("j.rs", 8, "too big")]);
        assert_eq!(records[1].failure_count, 1);
        assert!(!records[1].passed());
        assert_eq!(reporter.counters().total_failed, 1);
    }

    #[test]
    fn test_failures_between_tests_go_to_suite_marker() {
        let mut reporter = DeferredReporter::new();
        reporter.suite_start(&Suite::new("Io"));

        let lava = Test::new("lava");
        reporter.test_start(&lava);
        reporter.test_finish(&lava);

        // A fixture that fails to set up never starts a test
        reporter.report_failure(&Failure::new("io.rs", 40, "Setup aborted: cold"));

        let records = reporter.records();
        assert_eq!(records.len(), 2);
        assert!(records[1].failures.is_empty());
        assert!(records[1].passed());
        assert_eq!(
            records[0].failures,
            vec![Failure::new("io.rs", 40, "Setup aborted: cold")]
        );
    }

    #[test]
    fn test_failures_before_first_test_go_to_suite_marker() {
        let mut reporter = DeferredReporter::new();
        reporter.suite_start(&Suite::new("Europa"));
        reporter.report_failure(&Failure::new("e.rs", 3, "ice"));

        let ocean = Test::new("ocean");
        reporter.test_start(&ocean);
        reporter.test_finish(&ocean);

        let records = reporter.records();
        assert_eq!(records[0].failures.len(), 1);
        assert!(records[1].failures.is_empty());
    }

    #[test]
    fn test_clear_drops_records() {
        let mut reporter = DeferredReporter::new();
        reporter.suite_start(&Suite::new("Saturn"));
        reporter.clear();
        assert!(reporter.records().is_empty());
        assert_eq!(reporter.counters().suites, 0);
    }
}
