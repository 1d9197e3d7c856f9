//! Sample program: a tour of the unitrun macros.
//!
//! Some tests below fail on purpose to show the failure messages. The
//! program runs everything twice: once with the console reporter in trace
//! mode, once writing `test.xml`.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use unitrun::prelude::*;
use unitrun::{default_reporter, disable_suite, driver, run_all_tests, run_all_tests_with};
use unitrun::{Reporter, XmlReporter};

mod earth;
mod planet;

use planet::*;

suite!(EarthSuite {
    test_case! {
        fn earth_shape(t) {
            check!(t, earth_is_round());
        }
    }

    test_case! {
        fn how_big_is_earth(t) {
            check_close!(t, 6371.0, earth_radius_km(), 1.0);
        }
    }

    test_case! {
        fn planet_name_is_earth(t) {
            check_equal!(t, "Earth", planet_name());
        }
    }

    // Fails
    test_case! {
        fn martians(t) {
            check_equal!(t, "Mars", planet_name());
        }
    }

    test_case! {
        fn end_of_the_earth(t) {
            check_panics!(t, go_to_end_of_earth());
            check_panics_eq!(t, "Earth is not flat!", go_to_end_of_earth());
        }
    }

    test_case! {
        fn earth_in_numbers(t) {
            require_true!(earth_is_round());
            expect_eq!(t, planet_name(), "Earth");
            expect_gt!(t, earth_radius_km(), 6000.0);
            expect_near!(t, earth_radius_km(), 6371.0, 2.0);
        }
    }
});

const FIBONACCI_10: [u64; 10] = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55];

test_case! {
    fn fibonacci_10(t) {
        let mut fibs = fibonacci(10).unwrap_or_default();
        check_array_equal!(t, FIBONACCI_10, fibs, 10);
        check_equal!(t, FIBONACCI_10.to_vec(), fibs);

        // Shows the message produced when sequences differ
        fibs[0] = 2;
        check_equal!(t, FIBONACCI_10.to_vec(), fibs);
    }
}

test_case! {
    fn vector_close(t) {
        let expected: Vec<f64> = FIBONACCI_10.iter().map(|&v| v as f64).collect();
        let mut actual: Vec<f64> = expected
            .iter()
            .enumerate()
            .map(|(i, v)| v + jitter(i))
            .collect();
        check_array_close!(t, expected, actual, 0.05);

        actual[1] += 1.0;
        check_array_close!(t, expected, actual, 0.05);
    }
}

test_case! {
    fn array2d_equal(t) {
        let mut expected = [[0_i32; 8]; 10];
        for (i, row) in expected.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (i * 10 + j) as i32;
            }
        }
        let mut actual = expected;
        check_array2d_equal!(t, expected, actual);

        actual[2][3] = 0;
        check_array2d_equal!(t, expected, actual);
    }
}

test_case! {
    fn array2d_close(t) {
        let mut expected = [[0.0_f64; 8]; 10];
        let mut actual = [[0.0_f64; 8]; 10];
        for i in 0..10 {
            for j in 0..8 {
                expected[i][j] = (i * 10 + j) as f64;
                actual[i][j] = expected[i][j] + jitter(i * 8 + j);
            }
        }
        check_array2d_close!(t, expected, actual, 0.05);

        // Too strict, fails
        check_array2d_close!(t, expected, actual, 0.001);
    }
}

test_case! {
    fn fibonacci_rejects_bad_input(t) {
        check_err!(t, fibonacci(-1));
        check_err!(t, fibonacci(200));
        check_equal!(t, Err(FibonacciError::TooBig), fibonacci(101));
    }
}

// gtest-style names; the failure shows both operands
test_case! {
    fn fibonacci_bounds(t) {
        let fibs = fibonacci(10).unwrap_or_default();
        require_eq!(fibs.len(), 10);
        expect_le!(t, fibs[9], 55);
        expect_lt!(t, fibs[9], 50);
    }
}

struct Account {
    usd: f64,
    eur: f64,
    chf: f64,
}

impl Fixture for Account {
    fn set_up() -> Result<Self, Abort> {
        println!("Account fixture constructed");
        Ok(Account {
            usd: 100.0,
            eur: 0.0,
            chf: 0.0,
        })
    }
}

impl Drop for Account {
    fn drop(&mut self) {
        println!("Account fixture destructed");
    }
}

test_case! {
    fn exchange_eur(t, account: Account) {
        account.eur = exchange(&mut account.usd, EXCHANGE_RATE_EUR);
        check_equal!(t, 0.0, account.usd);
        check!(t, account.eur > 0.0);
    }
}

test_case! {
    fn exchange_chf(t, account: Account) {
        account.chf = exchange(&mut account.usd, EXCHANGE_RATE_CHF);
        check_equal!(t, 0.0, account.usd);
        check!(t, account.chf > 0.0);
    }
}

test_case! {
    fn unexpected_panic(t, account: Account) {
        let balances: Vec<f64> = Vec::new();
        account.usd = balances[2];
    }
}

test_case! {
    fn abort_on_empty_account(t, account: Account) {
        account.chf = exchange(&mut account.usd, EXCHANGE_RATE_CHF);
        abort!(account.usd > 0.0);
        println!("Never gets here");
    }
}

test_case! {
    fn abort_ex_on_empty_account(t, account: Account) {
        account.chf = exchange(&mut account.usd, EXCHANGE_RATE_CHF);
        abort_ex!(account.usd > 0.0, "USD amount is {}!!", account.usd);
        println!("Never gets here");
    }
}

struct ImpossibleFixture;

impl Fixture for ImpossibleFixture {
    fn set_up() -> Result<Self, Abort> {
        abort_ex!(false, "This fixture cannot be set up");
        Ok(ImpossibleFixture)
    }
}

test_case! {
    fn impossible_test(t, fixture: ImpossibleFixture) {
        println!("Never gets here");
    }
}

suite!(Timing {
    test_case! {
        fn local_limit(t) {
            time_constraint!(t, 10);
            unitrun::clock::sleep_ms(30);
        }
    }

    test_case! {
        fn exempt_from_global_limit(t) {
            time_constraint_exempt!(t);
            unitrun::clock::sleep_ms(30);
        }
    }
});

// Disabled in main
suite!(NotRun {
    test_case! {
        fn fails_always(t) {
            check!(t, false);
        }
    }
});

fn main() -> Result<ExitCode> {
    disable_suite("NotRun")?;
    default_reporter().set_trace(true);

    let failed = run_all_tests()?;

    let path = "test.xml";
    let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
    let mut xml = XmlReporter::new(BufWriter::new(file));
    run_all_tests_with(&mut xml, 0)?;
    println!("XML report written to {}", path);

    Ok(driver::exit_code(failed))
}
