//! XML reporter
//!
//! Buffers the run and writes one document when the run is summarized:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <unitrun-results total="2" failed="1" failures="1" duration="0.015">
//!  <start-time>2024-05-01 10:00:00Z</start-time>
//!  <command-line>./earth_tests --format xml</command-line>
//!  <suite name="Earth">
//!   <test name="gravity" time_ms="3"/>
//!   <test name="oceans" time_ms="12">
//!    <failure message="earth.rs(17) : Check failed: wet"/>
//!   </test>
//!  </suite>
//!  <end-time>2024-05-01 10:00:01Z</end-time>
//! </unitrun-results>
//! ```

use super::{Counters, DeferredReporter, Reporter, TestRecord};
use crate::failure::Failure;
use crate::suite::{Suite, DEFAULT_SUITE};
use crate::test::Test;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

pub struct XmlReporter<W: Write> {
    out: W,
    deferred: DeferredReporter,
    start_time: DateTime<Utc>,
    command_line: String,
}

impl<W: Write> XmlReporter<W> {
    /// A reporter that records this process's arguments as its command line
    pub fn new(out: W) -> Self {
        Self {
            out,
            deferred: DeferredReporter::new(),
            start_time: Utc::now(),
            command_line: std::env::args().collect::<Vec<_>>().join(" "),
        }
    }

    pub fn with_command_line(mut self, command_line: impl Into<String>) -> Self {
        self.command_line = command_line.into();
        self
    }

    pub fn records(&self) -> &[TestRecord] {
        self.deferred.records()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Build the report document for the results collected so far
    pub fn render(&self, end_time: DateTime<Utc>) -> String {
        let c = self.deferred.counters();
        let mut doc = String::new();

        let _ = writeln!(doc, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        let _ = writeln!(
            doc,
            "<unitrun-results total=\"{}\" failed=\"{}\" failures=\"{}\" duration=\"{:.3}\">",
            c.total_tests,
            c.total_failed,
            c.total_failures,
            c.total_time.as_secs_f64()
        );
        let _ = writeln!(
            doc,
            " <start-time>{}</start-time>",
            self.start_time.format(TIMESTAMP_FORMAT)
        );
        let _ = writeln!(
            doc,
            " <command-line>{}</command-line>",
            escape(&self.command_line)
        );

        let records = self.deferred.records();
        let mut suite_open = false;
        for (i, record) in records.iter().enumerate() {
            if record.is_suite_marker() {
                if suite_open {
                    doc.push_str(" </suite>\n");
                }
                doc.push_str(" <suite");
                if record.suite != DEFAULT_SUITE {
                    let _ = write!(doc, " name=\"{}\"", escape(&record.suite));
                }
                let has_tests = records
                    .get(i + 1)
                    .map_or(false, |next| !next.is_suite_marker());
                if has_tests || !record.failures.is_empty() {
                    doc.push_str(">\n");
                    for failure in &record.failures {
                        write_failure(&mut doc, "  ", failure);
                    }
                    suite_open = true;
                } else {
                    doc.push_str(" />\n");
                    suite_open = false;
                }
            } else {
                write_test(&mut doc, record);
            }
        }
        if suite_open {
            doc.push_str(" </suite>\n");
        }

        let _ = writeln!(
            doc,
            " <end-time>{}</end-time>",
            end_time.format(TIMESTAMP_FORMAT)
        );
        doc.push_str("</unitrun-results>\n");
        doc
    }
}

fn write_test(doc: &mut String, record: &TestRecord) {
    let name = record.test.as_deref().unwrap_or_default();
    let _ = write!(
        doc,
        "  <test name=\"{}\" time_ms=\"{}\"",
        escape(name),
        record.time_ms
    );
    if record.failures.is_empty() {
        doc.push_str("/>\n");
        return;
    }
    doc.push_str(">\n");
    for failure in &record.failures {
        write_failure(doc, "   ", failure);
    }
    doc.push_str("  </test>\n");
}

fn write_failure(doc: &mut String, indent: &str, failure: &Failure) {
    let _ = writeln!(
        doc,
        "{}<failure message=\"{}\"/>",
        indent,
        escape(&failure_message(failure))
    );
}

fn failure_message(failure: &Failure) -> String {
    format!(
        "{}({}) : {}",
        failure.filename, failure.line, failure.message
    )
}

/// Escape the five XML special characters
pub(crate) fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl<W: Write> Reporter for XmlReporter<W> {
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
        let doc = self.render(Utc::now());
        let written = self
            .out
            .write_all(doc.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            tracing::error!(%err, "could not write XML report");
        }
        self.deferred.summary()
    }

    fn clear(&mut self) {
        self.deferred.clear();
        self.start_time = Utc::now();
    }
}
