//! Implementation of the node rules of the simplification engine.
//!
//! Each rule in this module is a function that takes the expression to simplify as an argument,
//! whose children have already been simplified, and returns `Some((expr, step))` with the
//! simplified expression and the step taken if the rule applies, or `None` if the rule does not
//! apply.
//!
//! A rule may return an expression identical to its input; the engine checks for this before
//! recording the step.

pub mod add;
pub mod distribute;
pub mod multiply;
pub mod power;

use crate::integer;
use super::{Engine, Expr, Primary, Strategy, step::Step};

/// If the expression is an add expression, calls the given transformation function with the
/// terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_add<T>(expr: &Expr, f: impl FnOnce(&[Expr]) -> Option<T>) -> Option<T> {
    if let Expr::Add(terms) = expr {
        f(terms)
    } else {
        None
    }
}

/// If the expression is a multiplication expression, calls the given transformation function with
/// the factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_multiply<T>(expr: &Expr, f: impl FnOnce(&[Expr]) -> Option<T>) -> Option<T> {
    if let Expr::Mul(factors) = expr {
        f(factors)
    } else {
        None
    }
}

/// If the expression is a power expression, calls the given transformation function with the left
/// and right-hand-side of the power.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power<T>(expr: &Expr, f: impl FnOnce(&Expr, &Expr) -> Option<T>) -> Option<T> {
    if let Expr::Exp(lhs, rhs) = expr {
        f(lhs, rhs)
    } else {
        None
    }
}

/// `4/2 = 2`
fn reduce_fraction(expr: &Expr) -> Option<(Expr, Step)> {
    match expr {
        Expr::Primary(Primary::Rational(value)) if value.is_integer() => {
            Some((value.clone().into_expr(), Step::ReduceFraction))
        },
        _ => None,
    }
}

/// `1 + x + 2 + x = 2x + 3`
fn combine_like_terms(engine: &Engine, expr: &Expr) -> Option<(Expr, Step)> {
    do_add(expr, |terms| {
        Some((engine.simplify_addition(terms.iter().cloned()), Step::CombineLikeTerms))
    })
}

/// `2 * x * 3 * x = 6x^2`
///
/// With the distributive strategy, `(a+b)*c = a*c + b*c`.
fn combine_like_factors(engine: &Engine, expr: &Expr) -> Option<(Expr, Step)> {
    do_multiply(expr, |factors| {
        let distributes = engine.strategy() == Strategy::Distribute
            && factors.iter().any(|factor| matches!(factor, Expr::Add(_)));
        let step = if distributes {
            Step::DistributiveProperty
        } else {
            Step::CombineLikeFactors
        };
        Some((engine.simplify_multiplication(factors.iter().cloned()), step))
    })
}

/// `x^1 = x`, `(2/3)^-1 = 3/2`, `27^(1/3) = 3`, etc.
fn exponentiation(engine: &Engine, expr: &Expr) -> Option<(Expr, Step)> {
    do_power(expr, |base, exp| power::simplify_exponentiation(engine, base, exp))
}

/// `12^(1/2) * 3^(1/2) = 6`
fn rational_powers(engine: &Engine, expr: &Expr) -> Option<(Expr, Step)> {
    match expr {
        Expr::RationalPow(_) | Expr::RationalProduct(_) => {
            Some((engine.renormalize(expr.clone()), Step::RationalPower))
        },
        _ => None,
    }
}

/// `gcd(4, 6) = 2`, for positive integers only.
fn gcd(expr: &Expr) -> Option<(Expr, Step)> {
    let Expr::Gcd(a, b) = expr else {
        return None;
    };
    let value = integer::gcd(a.as_integer()?, b.as_integer()?).ok()?;
    Some((value, Step::Gcd))
}

/// `lcm(4, 6) = 12`, for positive integers only.
fn lcm(expr: &Expr) -> Option<(Expr, Step)> {
    let Expr::Lcm(a, b) = expr else {
        return None;
    };
    let value = integer::lcm(a.as_integer()?, b.as_integer()?).ok()?;
    Some((value, Step::Lcm))
}

/// `<(a, b), (c, d)> = a*c + b*d`, for vectors of equal, nonzero dimension.
fn dot_product(engine: &Engine, expr: &Expr) -> Option<(Expr, Step)> {
    let Expr::DotProduct(lhs, rhs) = expr else {
        return None;
    };
    let (Expr::Vector(lhs), Expr::Vector(rhs)) = (&**lhs, &**rhs) else {
        return None;
    };
    if lhs.is_empty() || lhs.len() != rhs.len() {
        return None;
    }

    let terms = lhs.iter()
        .zip(rhs)
        .map(|(l, r)| engine.simplify_multiplication([l.clone(), r.clone()]));
    Some((engine.simplify_addition(terms), Step::DotProduct))
}

/// Applies all rules.
pub(crate) fn all(engine: &Engine, expr: &Expr) -> Option<(Expr, Step)> {
    reduce_fraction(expr)
        .or_else(|| combine_like_terms(engine, expr))
        .or_else(|| combine_like_factors(engine, expr))
        .or_else(|| exponentiation(engine, expr))
        .or_else(|| rational_powers(engine, expr))
        .or_else(|| gcd(expr))
        .or_else(|| lcm(expr))
        .or_else(|| dot_product(engine, expr))
}
