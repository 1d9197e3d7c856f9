//! Local time budget for part of a test

use crate::clock::Stopwatch;
use crate::context::TestContext;

/// Reports a failure when dropped if its scope ran longer than `max_ms`.
///
/// Independent of the suite-wide budget: both can fire for the same test.
/// Usually created through [`time_constraint!`](crate::time_constraint).
pub struct TimeConstraint<'a, 'r> {
    ctx: &'a TestContext<'r>,
    max_ms: u64,
    file: &'static str,
    line: u32,
    watch: Stopwatch,
}

impl<'a, 'r> TimeConstraint<'a, 'r> {
    pub fn new(ctx: &'a TestContext<'r>, max_ms: u64, file: &'static str, line: u32) -> Self {
        Self {
            ctx,
            max_ms,
            file,
            line,
            watch: Stopwatch::start(),
        }
    }
}

impl Drop for TimeConstraint<'_, '_> {
    fn drop(&mut self) {
        let elapsed = self.watch.elapsed_ms();
        if elapsed > self.max_ms {
            self.ctx.report_failure(
                self.file,
                self.line,
                format!(
                    "Time constraint failed. Expected to run test under {}ms but took {}ms.",
                    self.max_ms, elapsed
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::sleep_ms;
    use crate::reporter::DeferredReporter;
    use crate::suite::Suite;

    #[test]
    fn test_reports_when_budget_exceeded() {
        let mut reporter = DeferredReporter::new();
        {
            let ctx = TestContext::new(&mut reporter);
            ctx.enter_suite(&Suite::new("Timing"));
            {
                let _limit = TimeConstraint::new(&ctx, 5, "timing.rs", 12);
                sleep_ms(25);
            }
        }
        let failure = &reporter.records()[0].failures[0];
        assert_eq!(failure.line, 12);
        assert!(failure
            .message
            .starts_with("Time constraint failed. Expected to run test under 5ms but took "));
    }

    #[test]
    fn test_silent_within_budget() {
        let mut reporter = DeferredReporter::new();
        {
            let ctx = TestContext::new(&mut reporter);
            ctx.enter_suite(&Suite::new("Timing"));
            let _limit = TimeConstraint::new(&ctx, 10_000, "timing.rs", 20);
        }
        assert!(reporter.records()[0].failures.is_empty());
    }
}
