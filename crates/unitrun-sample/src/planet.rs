//! Functions under test

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FibonacciError {
    #[error("Invalid fibonacci n")]
    Invalid,
    #[error("Fibonacci n is too big")]
    TooBig,
}

pub fn earth_is_round() -> bool {
    true
}

pub fn earth_radius_km() -> f64 {
    6370.0
}

pub fn planet_name() -> &'static str {
    "Earth"
}

pub fn go_to_end_of_earth() {
    panic!("Earth is not flat!");
}

/// First `n` Fibonacci numbers, 1 <= n <= 100
pub fn fibonacci(n: i32) -> Result<Vec<u64>, FibonacciError> {
    if n <= 0 {
        return Err(FibonacciError::Invalid);
    }
    if n > 100 {
        return Err(FibonacciError::TooBig);
    }
    let mut numbers = vec![1_u64];
    let (mut a, mut b) = (1_u64, 1_u64);
    for _ in 1..n {
        numbers.push(b);
        (a, b) = (b, a.saturating_add(b));
    }
    Ok(numbers)
}

pub const EXCHANGE_RATE_EUR: f64 = 0.85;
pub const EXCHANGE_RATE_CHF: f64 = 0.99;

/// Converts the whole USD balance, leaving it empty
pub fn exchange(usd: &mut f64, rate: f64) -> f64 {
    let converted = *usd * rate;
    *usd = 0.0;
    converted
}

/// Deterministic noise, always within +/- 0.049
pub fn jitter(i: usize) -> f64 {
    (i as f64 * 7.3).sin() * 0.049
}
