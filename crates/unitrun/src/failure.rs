//! Failure records and the test-abort signal

use serde::Serialize;
use std::fmt;

/// A recorded assertion failure: where it happened and what went wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Source file where the failure was detected
    pub filename: String,
    /// Line number where the failure was detected
    pub line: u32,
    /// Failure description
    pub message: String,
}

impl Failure {
    pub fn new(filename: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): {}", self.filename, self.line, self.message)
    }
}

/// Deliberate early termination of one test body.
///
/// Raised by `abort!`/`abort_ex!` and returned as the `Err` side of
/// [`TestResult`]. Carries its own location, unlike unexpected panics which
/// are attributed to the test declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abort {
    pub file: &'static str,
    pub line: u32,
    pub message: String,
}

impl Abort {
    pub fn new(file: &'static str, line: u32, message: impl Into<String>) -> Self {
        Self {
            file,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): {}", self.file, self.line, self.message)
    }
}

/// Outcome of a test body or fixture setup
pub type TestResult = Result<(), Abort>;
