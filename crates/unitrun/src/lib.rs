//! Unitrun - a small unit-testing framework
//!
//! Tests are declared with [`test_case!`], optionally grouped with
//! [`suite!`], and registered at link time. A run walks the suites in
//! declaration order, isolates every test from the failures and panics of
//! the others, and reports events to a [`Reporter`]: colored console
//! output, an XML document, JSON, or `tracing` events.
//!
//! # Example
//!
//! ```ignore
//! use unitrun::prelude::*;
//!
//! test_case! {
//!     fn arithmetic(t) {
//!         check_equal!(t, 4, 2 + 2);
//!         check_close!(t, 0.3, 0.1 + 0.2, 1e-9);
//!     }
//! }
//!
//! suite!(Strings {
//!     test_case! {
//!         fn concat(t) {
//!             check_equal!(t, "ab", ["a", "b"].concat());
//!         }
//!     }
//! });
//!
//! unitrun::test_main!();
//! ```
//!
//! # Failure isolation
//!
//! A failed check records a [`Failure`] and the test keeps going.
//! `abort!` stops the current test only. A panic inside a test, its
//! fixture setup or its teardown is caught and reported as a failure of
//! that test; the run continues with the next one.

pub mod checks;
pub mod clock;
pub mod context;
pub mod driver;
pub mod error;
pub mod failure;
mod macros;
pub mod registration;
pub mod registry;
pub mod reporter;
pub mod suite;
pub mod time_constraint;

pub use context::TestContext;
pub use error::{RunError, RunResult};
pub use failure::{Abort, Failure, TestResult};
pub use registration::{Registration, TestDescriptor};
pub use registry::{
    disable_suite, enable_suite, run_all_tests, run_all_tests_with, run_suite, run_suite_with,
    Registry,
};
pub use reporter::{
    default_reporter, ConsoleReporter, Counters, DeferredReporter, JsonReporter, Reporter,
    SilentReporter, TestRecord, TraceReporter, XmlReporter,
};
pub use suite::{Suite, DEFAULT_SUITE};
pub use test::{BoxedCase, Fixture, Test, TestCase, TestFactory};
pub use time_constraint::TimeConstraint;

#[doc(hidden)]
pub use inventory;

/// Everything a test file needs: `use unitrun::prelude::*;`
pub mod prelude {
    pub use crate::{
        abort, abort_ex, check, check_array2d_close, check_array2d_equal, check_array_close,
        check_array_equal, check_close, check_close_ex, check_equal, check_equal_ex, check_err,
        check_ex, check_file_equal, check_panics, check_panics_eq, expect_eq, expect_false,
        expect_ge, expect_gt, expect_le, expect_lt, expect_ne, expect_near, expect_panics,
        expect_true, require_eq, require_false, require_ge, require_gt, require_le, require_lt,
        require_ne, require_panics, require_true, suite, test_case, time_constraint,
        time_constraint_exempt,
    };
    pub use crate::{Abort, Fixture, TestContext, TestResult};

    /// Suite of tests declared outside any `suite!`; shadowed inside one
    #[doc(hidden)]
    pub const __UNITRUN_SUITE: &str = crate::DEFAULT_SUITE;
}
