//! Exact operations on integers used by the simplification engine.

pub mod primes;

use crate::error::ArgumentError;
use crate::symbolic::expr::Expr;
use rug::Integer;

pub use primes::{calculate_primes, factorize, Factorization, PrimeTable};

/// Returns an error if the given integer is not strictly positive.
fn ensure_positive(n: &Integer) -> Result<(), ArgumentError> {
    if *n > 0 {
        Ok(())
    } else {
        Err(ArgumentError::NotPositive(n.clone()))
    }
}

/// Computes the greatest common divisor of two positive integers.
pub fn gcd(a: &Integer, b: &Integer) -> Result<Expr, ArgumentError> {
    ensure_positive(a)?;
    ensure_positive(b)?;
    Ok(Expr::from(Integer::from(a.gcd_ref(b))))
}

/// Computes the least common multiple of two positive integers, `a * b / gcd(a, b)`.
pub fn lcm(a: &Integer, b: &Integer) -> Result<Expr, ArgumentError> {
    ensure_positive(a)?;
    ensure_positive(b)?;
    Ok(Expr::from(Integer::from(a.lcm_ref(b))))
}
