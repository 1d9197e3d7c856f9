//! Declaration and assertion macros
//!
//! Assertion macros take the test context first (`t` inside a
//! [`test_case!`]) and report through
//! [`TestContext::report_failure`](crate::TestContext::report_failure) with
//! the location of the macro call.

/// Group the tests declared inside into a named suite.
///
/// ```ignore
/// use unitrun::prelude::*;
///
/// suite!(Earth {
///     test_case! {
///         fn gravity(t) {
///             check_close!(t, 9.81, measure(), 0.01);
///         }
///     }
/// });
/// ```
#[macro_export]
macro_rules! suite {
    ($name:ident { $($body:tt)* }) => {
        #[allow(non_snake_case)]
        mod $name {
            #[allow(unused_imports)]
            use super::*;

            #[doc(hidden)]
            #[allow(dead_code)]
            const __UNITRUN_SUITE: &str = ::std::stringify!($name);

            $($body)*
        }
    };
}

/// Declare and register a test.
///
/// The body receives the run context under the given name and may return
/// early with `abort!`/`abort_ex!` or `return Ok(())`. The fixture form
/// sets up a fresh fixture for every run and drops it afterwards:
///
/// ```ignore
/// test_case! {
///     fn deposit(t, account: Account) {
///         account.deposit(10.0);
///         check_close!(t, 10.0, account.balance(), 0.001);
///     }
/// }
/// ```
///
/// Tests outside a [`suite!`] belong to the default suite; the prelude must
/// be glob-imported where the macro is used.
#[macro_export]
macro_rules! test_case {
    (fn $name:ident ($t:ident) $body:block) => {
        #[allow(non_snake_case, unused_variables, unreachable_code)]
        fn $name($t: &$crate::TestContext<'_>) -> $crate::TestResult {
            $body
            ::std::result::Result::Ok(())
        }

        const _: () = {
            fn factory() -> ::std::result::Result<$crate::BoxedCase, $crate::Abort> {
                $crate::test::plain($name)
            }

            $crate::inventory::submit! {
                $crate::Registration::new(
                    __UNITRUN_SUITE,
                    ::std::stringify!($name),
                    ::std::file!(),
                    ::std::line!(),
                    factory,
                )
            }
        };
    };
    (fn $name:ident ($t:ident, $fx:ident : $fixture:ty) $body:block) => {
        #[allow(non_snake_case, unused_variables, unreachable_code)]
        fn $name($fx: &mut $fixture, $t: &$crate::TestContext<'_>) -> $crate::TestResult {
            $body
            ::std::result::Result::Ok(())
        }

        const _: () = {
            fn factory() -> ::std::result::Result<$crate::BoxedCase, $crate::Abort> {
                $crate::test::with_fixture::<$fixture>($name)
            }

            $crate::inventory::submit! {
                $crate::Registration::new(
                    __UNITRUN_SUITE,
                    ::std::stringify!($name),
                    ::std::file!(),
                    ::std::line!(),
                    factory,
                )
            }
        };
    };
}

/// Generate `fn main` running the command-line driver
#[macro_export]
macro_rules! test_main {
    () => {
        fn main() -> ::std::process::ExitCode {
            $crate::driver::main()
        }
    };
}

#[macro_export]
macro_rules! check {
    ($t:expr, $cond:expr $(,)?) => {
        if !($cond) {
            $t.report_failure(
                ::std::file!(),
                ::std::line!(),
                ::std::concat!("Check failed: ", ::std::stringify!($cond)),
            );
        }
    };
}

/// [`check!`] with a custom message
#[macro_export]
macro_rules! check_ex {
    ($t:expr, $cond:expr, $($msg:tt)+) => {
        if !($cond) {
            $t.report_failure(::std::file!(), ::std::line!(), ::std::format!($($msg)+));
        }
    };
}

#[macro_export]
macro_rules! check_equal {
    ($t:expr, $expected:expr, $actual:expr $(,)?) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_equal(&$expected, &$actual)
        {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

/// [`check_equal!`] with extra text appended after ` - `
#[macro_export]
macro_rules! check_equal_ex {
    ($t:expr, $expected:expr, $actual:expr, $($msg:tt)+) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_equal(&$expected, &$actual)
        {
            $t.report_failure(
                ::std::file!(),
                ::std::line!(),
                ::std::format!("{} - {}", message, ::std::format!($($msg)+)),
            );
        }
    };
}

#[macro_export]
macro_rules! check_close {
    ($t:expr, $expected:expr, $actual:expr, $tolerance:expr $(,)?) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_close($expected, $actual, $tolerance)
        {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

#[macro_export]
macro_rules! check_close_ex {
    ($t:expr, $expected:expr, $actual:expr, $tolerance:expr, $($msg:tt)+) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_close($expected, $actual, $tolerance)
        {
            $t.report_failure(
                ::std::file!(),
                ::std::line!(),
                ::std::format!("{} - {}", message, ::std::format!($($msg)+)),
            );
        }
    };
}

/// Compare two sequences element by element, or only their first `count`
/// elements
#[macro_export]
macro_rules! check_array_equal {
    ($t:expr, $expected:expr, $actual:expr $(,)?) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_array_equal(&$expected[..], &$actual[..])
        {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
    ($t:expr, $expected:expr, $actual:expr, $count:expr $(,)?) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_array_equal(&$expected[..$count], &$actual[..$count])
        {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

#[macro_export]
macro_rules! check_array_close {
    ($t:expr, $expected:expr, $actual:expr, $tolerance:expr $(,)?) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_array_close(&$expected[..], &$actual[..], $tolerance)
        {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
    ($t:expr, $expected:expr, $actual:expr, $count:expr, $tolerance:expr $(,)?) => {
        if let ::std::result::Result::Err(message) = $crate::checks::check_array_close(
            &$expected[..$count],
            &$actual[..$count],
            $tolerance,
        ) {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

#[macro_export]
macro_rules! check_array2d_equal {
    ($t:expr, $expected:expr, $actual:expr $(,)?) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_array2d_equal(&$expected[..], &$actual[..])
        {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

#[macro_export]
macro_rules! check_array2d_close {
    ($t:expr, $expected:expr, $actual:expr, $tolerance:expr $(,)?) => {
        if let ::std::result::Result::Err(message) =
            $crate::checks::check_array2d_close(&$expected[..], &$actual[..], $tolerance)
        {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

/// Fail unless evaluating the expression panics
#[macro_export]
macro_rules! check_panics {
    ($t:expr, $expr:expr $(,)?) => {
        if !$crate::checks::panics(|| {
            let _ = $expr;
        }) {
            $t.report_failure(
                ::std::file!(),
                ::std::line!(),
                ::std::concat!("Expected panic not raised by ", ::std::stringify!($expr)),
            );
        }
    };
}

/// Fail unless the expression evaluates to `Err`
#[macro_export]
macro_rules! check_err {
    ($t:expr, $expr:expr $(,)?) => {
        if ($expr).is_ok() {
            $t.report_failure(
                ::std::file!(),
                ::std::line!(),
                ::std::concat!("Expected error not returned by ", ::std::stringify!($expr)),
            );
        }
    };
}

#[macro_export]
macro_rules! check_file_equal {
    ($t:expr, $reference:expr, $actual:expr $(,)?) => {
        if let ::std::result::Result::Err(message) = $crate::checks::check_file_equal(
            ::std::path::Path::new(&$reference),
            ::std::path::Path::new(&$actual),
        ) {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

/// Stop the enclosing test (or fixture setup) when the condition is false.
/// The failure message is the condition text.
#[macro_export]
macro_rules! abort {
    ($cond:expr $(,)?) => {
        if !($cond) {
            return ::std::result::Result::Err($crate::Abort::new(
                ::std::file!(),
                ::std::line!(),
                ::std::stringify!($cond),
            ));
        }
    };
}

#[macro_export]
macro_rules! abort_ex {
    ($cond:expr, $($msg:tt)+) => {
        if !($cond) {
            return ::std::result::Result::Err($crate::Abort::new(
                ::std::file!(),
                ::std::line!(),
                ::std::format!($($msg)+),
            ));
        }
    };
}

/// Limit the time spent from here to the end of the enclosing scope
#[macro_export]
macro_rules! time_constraint {
    ($t:expr, $max_ms:expr $(,)?) => {
        let _time_constraint =
            $crate::TimeConstraint::new($t, $max_ms, ::std::file!(), ::std::line!());
    };
}

/// Exempt the executing test from the global time budget
#[macro_export]
macro_rules! time_constraint_exempt {
    ($t:expr $(,)?) => {
        $t.no_time_constraint()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __unitrun_compare {
    ($left:expr, $op:tt, $right:expr) => {
        match (&$left, &$right) {
            (left, right) => $crate::checks::check_comparison(
                *left $op *right,
                ::std::concat!(
                    ::std::stringify!($left),
                    " ",
                    ::std::stringify!($op),
                    " ",
                    ::std::stringify!($right)
                ),
                left,
                right,
            ),
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __unitrun_expect {
    ($t:expr, $left:expr, $op:tt, $right:expr) => {
        if let ::std::result::Result::Err(message) =
            $crate::__unitrun_compare!($left, $op, $right)
        {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __unitrun_require {
    ($left:expr, $op:tt, $right:expr) => {
        if let ::std::result::Result::Err(message) =
            $crate::__unitrun_compare!($left, $op, $right)
        {
            return ::std::result::Result::Err($crate::Abort::new(
                ::std::file!(),
                ::std::line!(),
                message,
            ));
        }
    };
}

// gtest-style names. `expect_*!` reports and continues like `check!`;
// `require_*!` stops the test like `abort!`. Both print the operands on
// failure.

#[macro_export]
macro_rules! expect_true {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::check!($t, $cond)
    };
}

#[macro_export]
macro_rules! expect_false {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::check!($t, !($cond))
    };
}

#[macro_export]
macro_rules! expect_eq {
    ($t:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_expect!($t, $left, ==, $right)
    };
}

#[macro_export]
macro_rules! expect_ne {
    ($t:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_expect!($t, $left, !=, $right)
    };
}

#[macro_export]
macro_rules! expect_lt {
    ($t:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_expect!($t, $left, <, $right)
    };
}

#[macro_export]
macro_rules! expect_le {
    ($t:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_expect!($t, $left, <=, $right)
    };
}

#[macro_export]
macro_rules! expect_gt {
    ($t:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_expect!($t, $left, >, $right)
    };
}

#[macro_export]
macro_rules! expect_ge {
    ($t:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_expect!($t, $left, >=, $right)
    };
}

/// `actual` within `tolerance` of `expected`; the second operand is the
/// expected value
#[macro_export]
macro_rules! expect_near {
    ($t:expr, $actual:expr, $expected:expr, $tolerance:expr $(,)?) => {
        $crate::check_close!($t, $expected, $actual, $tolerance)
    };
}

#[macro_export]
macro_rules! expect_panics {
    ($t:expr, $expr:expr $(,)?) => {
        $crate::check_panics!($t, $expr)
    };
}

/// Fail unless evaluating the expression panics with a payload equal to
/// `value`. Text payloads compare by text.
#[macro_export]
macro_rules! check_panics_eq {
    ($t:expr, $value:expr, $expr:expr $(,)?) => {
        if let ::std::result::Result::Err(message) = $crate::checks::check_panic_payload(
            &$value,
            ::std::stringify!($expr),
            || {
                let _ = $expr;
            },
        ) {
            $t.report_failure(::std::file!(), ::std::line!(), message);
        }
    };
}

#[macro_export]
macro_rules! require_true {
    ($cond:expr $(,)?) => {
        $crate::abort!($cond)
    };
}

#[macro_export]
macro_rules! require_false {
    ($cond:expr $(,)?) => {
        $crate::abort!(!($cond))
    };
}

#[macro_export]
macro_rules! require_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_require!($left, ==, $right)
    };
}

#[macro_export]
macro_rules! require_ne {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_require!($left, !=, $right)
    };
}

#[macro_export]
macro_rules! require_lt {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_require!($left, <, $right)
    };
}

#[macro_export]
macro_rules! require_le {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_require!($left, <=, $right)
    };
}

#[macro_export]
macro_rules! require_gt {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_require!($left, >, $right)
    };
}

#[macro_export]
macro_rules! require_ge {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__unitrun_require!($left, >=, $right)
    };
}

/// Stop the test unless evaluating the expression panics
#[macro_export]
macro_rules! require_panics {
    ($expr:expr $(,)?) => {
        if !$crate::checks::panics(|| {
            let _ = $expr;
        }) {
            return ::std::result::Result::Err($crate::Abort::new(
                ::std::file!(),
                ::std::line!(),
                ::std::concat!("Expected panic not raised by ", ::std::stringify!($expr)),
            ));
        }
    };
}
