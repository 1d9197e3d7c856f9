//! Trace reporter - run events as structured `tracing` events
//!
//! Stands in for a debugger output channel: whatever subscriber the
//! program installs decides where the events end up. All events use the
//! `unitrun::report` target.

use super::{Counters, Position, Reporter};
use crate::failure::Failure;
use crate::suite::Suite;
use crate::test::Test;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct TraceReporter {
    counters: Counters,
    position: Position,
    trace: bool,
}

impl TraceReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for TraceReporter {
    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    fn suite_start(&mut self, suite: &Suite) {
        self.counters.suite_start();
        self.position.enter_suite(suite);
        if self.trace {
            info!(target: "unitrun::report", suite = suite.name(), "suite starting");
        }
    }

    fn test_start(&mut self, test: &Test) {
        self.counters.test_start();
        self.position.enter_test(test);
        if self.trace {
            info!(target: "unitrun::report", test = test.name(), "test starting");
        }
    }

    fn report_failure(&mut self, failure: &Failure) {
        warn!(
            target: "unitrun::report",
            suite = self.position.named_suite(),
            test = self.position.test(),
            file = %failure.filename,
            line = failure.line,
            "{}",
            failure.message
        );
    }

    fn test_finish(&mut self, test: &Test) {
        self.counters.test_finish(test);
        self.position.leave_test();
        if self.trace {
            info!(
                target: "unitrun::report",
                test = test.name(),
                elapsed_ms = test.elapsed_ms(),
                failures = test.failure_count(),
                "test finished"
            );
        }
    }

    fn suite_finish(&mut self, suite: &Suite) -> u32 {
        self.position.leave_suite();
        if self.trace {
            info!(
                target: "unitrun::report",
                suite = suite.name(),
                tests = self.counters.suite_tests,
                failed = self.counters.suite_failed,
                "suite finishing"
            );
        }
        self.counters.suite_failures
    }

    fn summary(&mut self) -> u32 {
        let c = self.counters;
        if c.total_failed > 0 {
            warn!(
                target: "unitrun::report",
                tests = c.total_tests,
                failed = c.total_failed,
                failures = c.total_failures,
                seconds = c.total_time.as_secs_f64(),
                "FAILURE: {} out of {} tests failed ({} failures).",
                c.total_failed,
                c.total_tests,
                c.total_failures
            );
        } else {
            info!(
                target: "unitrun::report",
                tests = c.total_tests,
                seconds = c.total_time.as_secs_f64(),
                "Success: {} tests passed.",
                c.total_tests
            );
        }
        c.total_failed
    }

    fn clear(&mut self) {
        self.counters = Counters::default();
        self.position = Position::default();
    }

    fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_like_any_reporter() {
        let mut reporter = TraceReporter::new();
        reporter.set_trace(true);
        let suite = Suite::new("Venus");
        let mut test = Test::new("clouds");
        test.failure();

        reporter.suite_start(&suite);
        reporter.test_start(&test);
        reporter.report_failure(&Failure::new("venus.rs", 2, "too hot"));
        reporter.test_finish(&test);

        assert_eq!(reporter.suite_finish(&suite), 1);
        assert_eq!(reporter.summary(), 1);
    }
}
