//! Comparison predicates behind the `check_*!` macros
//!
//! Each predicate returns `Ok(())` when the comparison holds, or the failure
//! message otherwise. The macros attach the source location and forward the
//! message to [`TestContext::report_failure`](crate::TestContext::report_failure).

use std::fmt::{Debug, Display, Write as _};
use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

pub fn check_equal<E, A>(expected: &E, actual: &A) -> Result<(), String>
where
    E: PartialEq<A> + Debug + ?Sized,
    A: Debug + ?Sized,
{
    if expected == actual {
        Ok(())
    } else {
        Err(format!("Expected {:?} but was {:?}", expected, actual))
    }
}

/// Decimal places used to print values compared with `tolerance`
fn precision(tolerance: f64) -> usize {
    let digits = (1.0 - tolerance.log10()).trunc();
    if digits.is_finite() {
        digits.clamp(0.0, 15.0) as usize
    } else {
        15
    }
}

fn is_close(expected: f64, actual: f64, tolerance: f64) -> bool {
    // NaN on either side is never close
    (actual - expected).abs() <= tolerance
}

pub fn check_close<E, A, T>(expected: E, actual: A, tolerance: T) -> Result<(), String>
where
    E: Into<f64>,
    A: Into<f64>,
    T: Into<f64>,
{
    let expected: f64 = expected.into();
    let actual: f64 = actual.into();
    let tolerance: f64 = tolerance.into();
    if is_close(expected, actual, tolerance) {
        return Ok(());
    }
    let p = precision(tolerance);
    Err(format!(
        "Expected {:.p$} +/- {:.p$} but was {:.p$}",
        expected,
        tolerance,
        actual,
        p = p
    ))
}

fn list<T: Display>(values: &[T]) -> String {
    let mut out = String::from("[ ");
    for v in values {
        let _ = write!(out, "{} ", v);
    }
    out.push(']');
    out
}

fn list_close<T: Into<f64> + Copy>(values: &[T], p: usize) -> String {
    let mut out = String::from("[ ");
    for v in values {
        let _ = write!(out, "{:.p$} ", Into::<f64>::into(*v), p = p);
    }
    out.push(']');
    out
}

pub fn check_array_equal<E, A>(expected: &[E], actual: &[A]) -> Result<(), String>
where
    E: PartialEq<A> + Display,
    A: Display,
{
    let equal = expected.len() == actual.len()
        && expected.iter().zip(actual).all(|(e, a)| e == a);
    if equal {
        Ok(())
    } else {
        Err(format!(
            "Expected {} but was {}",
            list(expected),
            list(actual)
        ))
    }
}

pub fn check_array_close<E, A>(expected: &[E], actual: &[A], tolerance: f64) -> Result<(), String>
where
    E: Into<f64> + Copy,
    A: Into<f64> + Copy,
{
    let close = expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| is_close((*e).into(), (*a).into(), tolerance));
    if close {
        return Ok(());
    }
    let p = precision(tolerance);
    Err(format!(
        "Expected {} +/- {:.p$} but was {}",
        list_close(expected, p),
        tolerance,
        list_close(actual, p),
        p = p
    ))
}

fn rows<R, T, F>(matrix: &[R], row_prefix: &str, mut render: F) -> String
where
    R: AsRef<[T]>,
    F: FnMut(&mut String, &T),
{
    let mut out = String::from("[\n");
    for row in matrix {
        out.push_str(row_prefix);
        for value in row.as_ref() {
            render(&mut out, value);
        }
        out.push_str("]\n");
    }
    out.push(']');
    out
}

fn cell<T: Display>(out: &mut String, value: &T) {
    let _ = write!(out, "{} ", value);
}

fn same_shape<RE, E, RA, A>(expected: &[RE], actual: &[RA]) -> bool
where
    RE: AsRef<[E]>,
    RA: AsRef<[A]>,
{
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| e.as_ref().len() == a.as_ref().len())
}

pub fn check_array2d_equal<RE, E, RA, A>(expected: &[RE], actual: &[RA]) -> Result<(), String>
where
    RE: AsRef<[E]>,
    RA: AsRef<[A]>,
    E: PartialEq<A> + Display,
    A: Display,
{
    let equal = same_shape::<RE, E, RA, A>(expected, actual)
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| e.as_ref().iter().zip(a.as_ref()).all(|(x, y)| x == y));
    if equal {
        return Ok(());
    }
    Err(format!(
        "Expected {} but was {}",
        rows(expected, " [", cell::<E>),
        rows(actual, " [", cell::<A>)
    ))
}

pub fn check_array2d_close<RE, E, RA, A>(
    expected: &[RE],
    actual: &[RA],
    tolerance: f64,
) -> Result<(), String>
where
    RE: AsRef<[E]>,
    RA: AsRef<[A]>,
    E: Into<f64> + Copy,
    A: Into<f64> + Copy,
{
    let close = same_shape::<RE, E, RA, A>(expected, actual)
        && expected.iter().zip(actual).all(|(e, a)| {
            e.as_ref()
                .iter()
                .zip(a.as_ref())
                .all(|(x, y)| is_close((*x).into(), (*y).into(), tolerance))
        });
    if close {
        return Ok(());
    }
    let p = precision(tolerance);
    Err(format!(
        "Expected {} +/- {:.p$} but was {}",
        rows(expected, " [ ", |out, v: &E| {
            let _ = write!(out, "{:.p$} ", Into::<f64>::into(*v), p = p);
        }),
        tolerance,
        rows(actual, " [ ", |out, v: &A| {
            let _ = write!(out, "{:.p$} ", Into::<f64>::into(*v), p = p);
        }),
        p = p
    ))
}

/// Compare two text files line by line, pointing at the first difference
pub fn check_file_equal(reference: &Path, actual: &Path) -> Result<(), String> {
    let (ref_name, act_name) = (reference.display(), actual.display());
    let (Ok(expected), Ok(found)) = (fs::read(reference), fs::read(actual)) else {
        return Err(format!(
            "Failed to open files while comparing {} and {}",
            ref_name, act_name
        ));
    };

    if expected.len() != found.len() {
        return Err(format!(
            "Size is different ({} vs {}) while comparing {} and {}",
            expected.len(),
            found.len(),
            ref_name,
            act_name
        ));
    }

    let lines = expected.split(|b| *b == b'\n').zip(found.split(|b| *b == b'\n'));
    for (number, (left, right)) in lines.enumerate() {
        if left != right {
            let position = left
                .iter()
                .zip(right)
                .take_while(|(l, r)| l == r)
                .count();
            return Err(format!(
                "Difference at line {} position {} while comparing {} and {}",
                number + 1,
                position,
                ref_name,
                act_name
            ));
        }
    }
    Ok(())
}

/// Failure message for a binary comparison that did not hold
pub fn check_comparison<L, R>(
    holds: bool,
    condition: &str,
    left: &L,
    right: &R,
) -> Result<(), String>
where
    L: Debug + ?Sized,
    R: Debug + ?Sized,
{
    if holds {
        Ok(())
    } else {
        Err(format!(
            "Check failed: {} (left: {:?}, right: {:?})",
            condition, left, right
        ))
    }
}

/// True when `f` panics
pub fn panics<F: FnOnce()>(f: F) -> bool {
    catch_unwind(AssertUnwindSafe(f)).is_err()
}

/// Require `f` to panic with a payload equal to `expected`.
///
/// Payloads of type `T` compare with `==`. Text payloads from `panic!`
/// compare by their text, so `"empty"` matches both `panic!("empty")` and
/// `panic!("{}", reason)`.
pub fn check_panic_payload<T, F>(expected: &T, expr: &str, f: F) -> Result<(), String>
where
    T: PartialEq + Debug + 'static,
    F: FnOnce(),
{
    let payload = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => return Err(format!("Expected panic not raised by {}", expr)),
        Err(payload) => payload,
    };
    let payload = payload.as_ref();
    if let Some(actual) = payload.downcast_ref::<T>() {
        return check_equal(expected, actual);
    }
    match crate::test::panic_message(payload) {
        Some(text) if format!("{:?}", text) == format!("{:?}", expected) => Ok(()),
        Some(text) => Err(format!("Expected {:?} but was {:?}", expected, text)),
        None => Err(format!("Unexpected panic payload from {}", expr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_equal_message() {
        assert_eq!(check_equal(&3, &3), Ok(()));
        assert_eq!(
            check_equal(&"Mars", &"Earth").unwrap_err(),
            r#"Expected "Mars" but was "Earth""#
        );
        assert_eq!(
            check_equal(&String::from("a"), &"a"),
            Ok(())
        );
    }

    #[rstest]
    #[case(0.05, 2)]
    #[case(0.1, 2)]
    #[case(1.0, 1)]
    #[case(100.0, 0)]
    #[case(0.0, 15)]
    fn test_precision(#[case] tolerance: f64, #[case] expected: usize) {
        assert_eq!(precision(tolerance), expected);
    }

    #[test]
    fn test_check_close() {
        assert_eq!(check_close(1.0, 1.04, 0.05), Ok(()));
        assert_eq!(
            check_close(1.0, 1.5, 0.05).unwrap_err(),
            "Expected 1.00 +/- 0.05 but was 1.50"
        );
        assert!(check_close(1.0, f64::NAN, 10.0).is_err());
        assert_eq!(check_close(3, 4_u8, 1), Ok(()));
    }

    #[test]
    fn test_check_array_equal() {
        assert_eq!(check_array_equal(&[1, 1, 2], &[1, 1, 2]), Ok(()));
        assert_eq!(
            check_array_equal(&[1, 1, 2], &[2, 1, 2]).unwrap_err(),
            "Expected [ 1 1 2 ] but was [ 2 1 2 ]"
        );
        assert!(check_array_equal(&[1, 2], &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_check_array_close() {
        assert_eq!(check_array_close(&[1.0, 2.0], &[1.01, 1.99], 0.05), Ok(()));
        assert_eq!(
            check_array_close(&[1.0, 2.0], &[1.0, 2.5], 0.05).unwrap_err(),
            "Expected [ 1.00 2.00 ] +/- 0.05 but was [ 1.00 2.50 ]"
        );
    }

    #[test]
    fn test_check_array2d_equal() {
        let a = [[0, 1], [2, 3]];
        let b = vec![vec![0, 1], vec![2, 4]];
        assert_eq!(check_array2d_equal(&a, &a), Ok(()));
        assert_eq!(
            check_array2d_equal(&a, &b).unwrap_err(),
            "Expected [\n [0 1 ]\n [2 3 ]\n] but was [\n [0 1 ]\n [2 4 ]\n]"
        );
    }

    #[test]
    fn test_check_array2d_close() {
        let a = [[1.0, 2.0]];
        let b = [[1.0, 2.2]];
        assert_eq!(
            check_array2d_close(&a, &b, 0.1).unwrap_err(),
            "Expected [\n [ 1.00 2.00 ]\n] +/- 0.10 but was [\n [ 1.00 2.20 ]\n]"
        );
        assert_eq!(check_array2d_close(&a, &b, 0.5), Ok(()));
    }

    #[test]
    fn test_check_file_equal() {
        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("ref.txt");
        let same = dir.path().join("same.txt");
        let differs = dir.path().join("differs.txt");
        let shorter = dir.path().join("shorter.txt");
        fs::write(&reference, "alpha\nbravo\n").unwrap();
        fs::write(&same, "alpha\nbravo\n").unwrap();
        fs::write(&differs, "alpha\nbrave\n").unwrap();
        fs::write(&shorter, "alpha\n").unwrap();

        assert_eq!(check_file_equal(&reference, &same), Ok(()));

        let err = check_file_equal(&reference, &differs).unwrap_err();
        assert!(err.starts_with("Difference at line 2 position 4 while comparing"));

        let err = check_file_equal(&reference, &shorter).unwrap_err();
        assert!(err.starts_with("Size is different (12 vs 6)"));

        let err = check_file_equal(&reference, &dir.path().join("missing.txt")).unwrap_err();
        assert!(err.starts_with("Failed to open files"));
    }

    #[test]
    fn test_panics() {
        assert!(panics(|| panic!("expected")));
        assert!(!panics(|| {}));
    }

    #[test]
    fn test_check_comparison() {
        assert_eq!(check_comparison(true, "1 < 2", &1, &2), Ok(()));
        assert_eq!(
            check_comparison(false, "x == y", &"Io", &"Europa").unwrap_err(),
            r#"Check failed: x == y (left: "Io", right: "Europa")"#
        );
    }

    #[test]
    fn test_check_panic_payload_text() {
        assert_eq!(check_panic_payload(&"empty", "pop()", || panic!("empty")), Ok(()));
        let reason = "empty";
        assert_eq!(
            check_panic_payload(&"empty", "pop()", || panic!("{}", reason)),
            Ok(())
        );
        assert_eq!(
            check_panic_payload(&"empty", "pop()", || panic!("full")).unwrap_err(),
            r#"Expected "empty" but was "full""#
        );
    }

    #[test]
    fn test_check_panic_payload_value() {
        let code = || {
            std::panic::panic_any(404_u16);
        };
        assert_eq!(check_panic_payload(&404_u16, "fetch()", code), Ok(()));
        assert_eq!(
            check_panic_payload(&200_u16, "fetch()", code).unwrap_err(),
            "Expected 200 but was 404"
        );
    }

    #[test]
    fn test_check_panic_payload_mismatches() {
        assert_eq!(
            check_panic_payload(&1, "noop()", || {}).unwrap_err(),
            "Expected panic not raised by noop()"
        );
        let other = || {
            std::panic::panic_any(2.5_f64);
        };
        assert_eq!(
            check_panic_payload(&1_u8, "other()", other).unwrap_err(),
            "Unexpected panic payload from other()"
        );
    }
}
