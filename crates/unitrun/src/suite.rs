//! Suites and the failure-isolating test lifecycle

use crate::context::TestContext;
use crate::registration::TestDescriptor;
use crate::test::{self, BoxedCase, Test};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, trace, warn};

/// Name of the suite that collects tests declared outside any `suite!`
pub const DEFAULT_SUITE: &str = "DefaultSuite";

/// A named, ordered group of tests
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    enabled: bool,
    tests: Vec<TestDescriptor>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            tests: Vec::new(),
        }
    }

    /// Append a test; declaration order is execution order
    pub fn add(&mut self, descriptor: TestDescriptor) {
        self.tests.push(descriptor);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn tests(&self) -> &[TestDescriptor] {
        &self.tests
    }

    /// Run every test of an enabled suite, returning the reporter's
    /// failure count for the suite.
    ///
    /// A disabled suite still produces suite start/finish events but no tests
    /// execute.
    pub fn run_tests(&self, ctx: &TestContext<'_>, max_time_ms: u64) -> u32 {
        self.execute(ctx, max_time_ms, false)
    }

    pub(crate) fn execute(&self, ctx: &TestContext<'_>, max_time_ms: u64, force: bool) -> u32 {
        let _span = tracing::debug_span!("suite", name = %self.name).entered();
        ctx.enter_suite(self);

        if self.enabled || force {
            debug!(tests = self.tests.len(), max_time_ms, "running suite");
            for descriptor in &self.tests {
                run_one(ctx, descriptor, max_time_ms);
            }
        } else {
            debug!("suite disabled, skipping its tests");
        }

        let failures = ctx.leave_suite(self);
        debug!(failures, "suite finished");
        failures
    }
}

/// Setup, run and teardown of one test, each behind its own unwind boundary
fn run_one(ctx: &TestContext<'_>, descriptor: &TestDescriptor, max_time_ms: u64) {
    let Some(mut case) = set_up(ctx, descriptor) else {
        return;
    };
    run(ctx, descriptor, &mut case, max_time_ms);
    tear_down(ctx, descriptor, case);
}

fn set_up(ctx: &TestContext<'_>, descriptor: &TestDescriptor) -> Option<BoxedCase> {
    trace!(test = %descriptor.name, "setting up");
    let factory = descriptor.factory;
    match catch_unwind(factory) {
        Ok(Ok(case)) => {
            ctx.begin_test(Test::new(&descriptor.name));
            Some(case)
        }
        Ok(Err(abort)) => {
            warn!(test = %descriptor.name, reason = %abort.message, "setup aborted");
            report_at_descriptor(
                ctx,
                descriptor,
                format!(
                    "Setup aborted: {} while setting up test {}",
                    abort.message, descriptor.name
                ),
            );
            None
        }
        Err(payload) => {
            warn!(test = %descriptor.name, "setup panicked");
            let message = match test::panic_message(payload.as_ref()) {
                Some(msg) => format!(
                    "Unhandled panic: {} while setting up test {}",
                    msg, descriptor.name
                ),
                None => format!("Unhandled panic while setting up test {}", descriptor.name),
            };
            report_at_descriptor(ctx, descriptor, message);
            None
        }
    }
}

fn run(ctx: &TestContext<'_>, descriptor: &TestDescriptor, case: &mut BoxedCase, max_time_ms: u64) {
    ctx.notify_test_start();
    trace!(test = %descriptor.name, "running");

    let outcome = catch_unwind(AssertUnwindSafe(|| test::run_timed(case.as_mut(), ctx)));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(abort)) => {
            debug!(test = %descriptor.name, reason = %abort.message, "test aborted");
            ctx.report_failure(abort.file, abort.line, format!("Test aborted: {}", abort.message));
        }
        Err(payload) => {
            warn!(test = %descriptor.name, "test panicked");
            let message = match test::panic_message(payload.as_ref()) {
                Some(msg) => format!(
                    "Unhandled panic: {} while running test {}",
                    msg, descriptor.name
                ),
                None => format!("Unhandled panic while running test {}", descriptor.name),
            };
            report_at_descriptor(ctx, descriptor, message);
        }
    }

    if let Some(test) = ctx.current_test() {
        let elapsed = test.elapsed_ms();
        if !test.is_time_exempt() && max_time_ms > 0 && elapsed > max_time_ms {
            report_at_descriptor(
                ctx,
                descriptor,
                format!(
                    "Global time constraint failed while running test {}. Expected under {}ms but took {}ms.",
                    descriptor.name, max_time_ms, elapsed
                ),
            );
        }
    }

    ctx.notify_test_finish();
}

fn tear_down(ctx: &TestContext<'_>, descriptor: &TestDescriptor, case: BoxedCase) {
    ctx.end_test();
    trace!(test = %descriptor.name, "tearing down");

    if let Err(payload) = catch_unwind(AssertUnwindSafe(move || drop(case))) {
        warn!(test = %descriptor.name, "teardown panicked");
        let message = match test::panic_message(payload.as_ref()) {
            Some(msg) => format!(
                "Unhandled panic: {} while tearing down test {}",
                msg, descriptor.name
            ),
            None => format!("Unhandled panic while tearing down test {}", descriptor.name),
        };
        report_at_descriptor(ctx, descriptor, message);
    }
}

fn report_at_descriptor(ctx: &TestContext<'_>, descriptor: &TestDescriptor, message: String) {
    ctx.report_failure(&descriptor.file, descriptor.line, message);
}
