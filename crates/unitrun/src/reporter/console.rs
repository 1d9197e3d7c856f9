//! Console reporter - failures and a summary as human-readable text

use super::{Counters, Position, Reporter};
use crate::failure::Failure;
use crate::suite::Suite;
use crate::test::Test;
use colored::{ColoredString, Colorize};
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// Writes each failure as it happens and a one-line summary at the end
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    counters: Counters,
    position: Position,
    trace: bool,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter on standard output, colored when stdout is a terminal
    pub fn stdout() -> Self {
        let color = io::stdout().is_terminal();
        Self::new(io::stdout()).with_color(color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Uncolored reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            counters: Counters::default(),
            position: Position::default(),
            trace: false,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.out, "{}", text) {
            tracing::warn!(%err, "console reporter could not write");
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
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
            self.line(format_args!("Suite starting: {}", suite.name()));
        }
    }

    fn test_start(&mut self, test: &Test) {
        self.counters.test_start();
        self.position.enter_test(test);
        if self.trace {
            self.line(format_args!("Test starting: {}", test.name()));
        }
    }

    fn report_failure(&mut self, failure: &Failure) {
        let header = self.paint(&self.position.failure_header(), |s| s.red().bold());
        self.line(header);
        self.line(failure);
    }

    fn test_finish(&mut self, test: &Test) {
        self.counters.test_finish(test);
        if self.trace {
            self.line(format_args!(
                "Test finished: {} ({}ms)",
                test.name(),
                test.elapsed_ms()
            ));
        }
        self.position.leave_test();
    }

    fn suite_finish(&mut self, suite: &Suite) -> u32 {
        if self.trace {
            self.line(format_args!("Suite finishing: {}", suite.name()));
        }
        self.position.leave_suite();
        self.counters.suite_failures
    }

    fn summary(&mut self) -> u32 {
        let counters = self.counters;
        let status = if counters.total_failed > 0 {
            let label = self.paint("FAILURE:", |s| s.red().bold());
            format!(
                "{} {} out of {} tests failed ({} failures).",
                label, counters.total_failed, counters.total_tests, counters.total_failures
            )
        } else {
            let label = self.paint("Success:", |s| s.green().bold());
            format!("{} {} tests passed.", label, counters.total_tests)
        };
        self.line(status);
        self.line(format_args!(
            "Run time: {:.2}",
            counters.total_time.as_secs_f64()
        ));
        if let Err(err) = self.out.flush() {
            tracing::warn!(%err, "console reporter could not flush");
        }
        counters.total_failed
    }

    fn clear(&mut self) {
        self.counters = Counters::default();
        self.position = Position::default();
    }

    fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }
}
