//! JSON reporter - machine-readable results written when the run is summarized

use super::{Counters, DeferredReporter, Reporter, TestRecord};
use crate::failure::Failure;
use crate::suite::Suite;
use crate::test::Test;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct Report<'a> {
    total: u32,
    failed: u32,
    failures: u32,
    duration_ms: u64,
    suites: Vec<SuiteReport<'a>>,
}

#[derive(Debug, Serialize)]
struct SuiteReport<'a> {
    name: &'a str,
    /// Failures reported between tests, such as fixture setup failures
    failures: &'a [Failure],
    tests: Vec<TestReport<'a>>,
}

#[derive(Debug, Serialize)]
struct TestReport<'a> {
    name: &'a str,
    passed: bool,
    time_ms: u64,
    failures: &'a [Failure],
}

pub struct JsonReporter<W: Write> {
    out: W,
    deferred: DeferredReporter,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            deferred: DeferredReporter::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn report(&self) -> Report<'_> {
        let c = self.deferred.counters();
        Report {
            total: c.total_tests,
            failed: c.total_failed,
            failures: c.total_failures,
            duration_ms: crate::clock::duration_ms(c.total_time),
            suites: group_by_suite(self.deferred.records()),
        }
    }
}

/// Fold the flat record log into one entry per suite start.
///
/// Failures reported outside any test stay on the suite entry. A test's
/// `passed` comes from its counted failures, not from the records around it.
fn group_by_suite(records: &[TestRecord]) -> Vec<SuiteReport<'_>> {
    let mut suites: Vec<SuiteReport<'_>> = Vec::new();
    for record in records {
        match &record.test {
            None => suites.push(SuiteReport {
                name: record.suite.as_str(),
                failures: &record.failures,
                tests: Vec::new(),
            }),
            Some(name) => {
                let test = TestReport {
                    name: name.as_str(),
                    passed: record.passed(),
                    time_ms: record.time_ms,
                    failures: &record.failures,
                };
                match suites.last_mut() {
                    Some(suite) => suite.tests.push(test),
                    None => suites.push(SuiteReport {
                        name: record.suite.as_str(),
                        failures: &[],
                        tests: vec![test],
                    }),
                }
            }
        }
    }
    suites
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn counters(&self) -> &Counters {
        self.deferred.counters()
    }

    fn counters_mut(&mut self) -> &mut Counters {
        self.deferred.counters_mut()
    }

    fn suite_start(&mut self, suite: &Suite) {
        self.deferred.suite_start(suite);
    }

    fn test_start(&mut self, test: &Test) {
        self.deferred.test_start(test);
    }

    fn report_failure(&mut self, failure: &Failure) {
        self.deferred.report_failure(failure);
    }

    fn test_finish(&mut self, test: &Test) {
        self.deferred.test_finish(test);
    }

    fn summary(&mut self) -> u32 {
        let json = serde_json::to_string_pretty(&self.report());
        let written = match json {
            Ok(json) => writeln!(self.out, "{}", json).and_then(|()| self.out.flush()),
            Err(err) => {
                tracing::error!(%err, "could not serialize JSON report");
                Ok(())
            }
        };
        if let Err(err) = written {
            tracing::error!(%err, "could not write JSON report");
        }
        self.deferred.summary()
    }

    fn clear(&mut self) {
        self.deferred.clear();
    }
}
