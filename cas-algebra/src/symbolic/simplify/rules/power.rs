//! Normalization of products of real-valued powers with rational exponents.
//!
//! A product such as `12^(1/2) * 3^(-1/2) * pi` is reduced to a canonical list of
//! [`RationalPow`] components by repeatedly applying a fixed sequence of rewrites until the list
//! stops changing:
//!
//! 1. Composite bases are exploded: `(n/d)^e = n^e * d^-e`, and `(a^b * c^d)^e = a^(b*e) *
//!    c^(d*e)`.
//! 2. If any base is zero and raised to a positive power, the whole product is zero.
//! 3. Components with equal bases are merged by adding their exponents.
//! 4. Components with an exponent of zero are removed.
//! 5. Integer bases have their exact roots extracted: `b^(p/q)` is rewritten using the prime
//!    factorization of `b^|p|`, so that `12^(1/2)` becomes `2 * 3^(1/2)`.
//! 6. Integer bases with equal exponents are merged by multiplying the bases.
//! 7. Bases raised to an even power are replaced with their absolute value.
//! 8. Components with a base of one are removed.

use crate::primitive::int;
use crate::symbolic::expr::{Expr, Primary, RationalPow};
use crate::symbolic::simplify::{fraction::Fraction, step::Step, Engine, Strategy};
use rug::{ops::Pow, Integer};
use tracing::{debug, warn};
use super::distribute;

/// The result of normalizing a product of powers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Normalized {
    /// The product is zero.
    Zero,

    /// The product is the product of these components. An empty list is the number one.
    Powers(Vec<RationalPow>),
}

/// Normalizes the product of the given powers to a fixpoint, or until the pass limit is reached.
pub(crate) fn normalize(engine: &Engine, components: Vec<RationalPow>) -> Normalized {
    let max_passes = engine.limits().max_passes;
    let mut current = components;
    for _ in 0..max_passes {
        let next = match normalize_pass(engine, current.clone()) {
            Normalized::Zero => return Normalized::Zero,
            Normalized::Powers(next) => next,
        };
        if next == current {
            return Normalized::Powers(next);
        }
        current = next;
    }

    warn!(max_passes, "normalization of a rational product did not reach a fixpoint");
    Normalized::Powers(current)
}

/// Applies every rewrite once, in order.
fn normalize_pass(engine: &Engine, components: Vec<RationalPow>) -> Normalized {
    let exploded = components.into_iter()
        .flat_map(explode)
        .collect::<Vec<_>>();

    if exploded.iter().any(|pow| pow.base.is_zero() && pow.exponent.is_positive()) {
        return Normalized::Zero;
    }

    // exponents are always in lowest terms, since `Fraction` normalizes itself
    let merged = merge_bases(exploded)
        .into_iter()
        .filter(|pow| !pow.exponent.is_zero())
        .flat_map(|pow| match pow.base {
            Expr::Primary(Primary::Integer(base)) => extract_root(engine, base, pow.exponent),
            base => vec![RationalPow::new(base, pow.exponent)],
        })
        .collect::<Vec<_>>();

    let powers = merge_exponents(merged)
        .into_iter()
        .map(|pow| {
            if pow.exponent.numer().is_even() {
                RationalPow::new(pow.base.abs_real(), pow.exponent)
            } else {
                pow
            }
        })
        .filter(|pow| !pow.base.is_one())
        .collect();

    Normalized::Powers(powers)
}

/// Splits a power whose base is a rational number, a power, or a product of powers.
fn explode(pow: RationalPow) -> Vec<RationalPow> {
    let RationalPow { base, exponent } = pow;
    match base {
        Expr::Primary(Primary::Rational(value)) => {
            let (numer, denom) = value.into_numer_denom();
            if denom == 1 {
                vec![RationalPow::new(Expr::from(numer), exponent)]
            } else {
                vec![
                    RationalPow::new(Expr::from(numer), exponent.clone()),
                    RationalPow::new(Expr::from(denom), -exponent),
                ]
            }
        },
        Expr::RationalPow(inner) => {
            let RationalPow { base, exponent: inner_exponent } = *inner;
            vec![RationalPow::new(base, inner_exponent * &exponent)]
        },
        Expr::RationalProduct(components) => components.into_iter()
            .map(|pow| RationalPow::new(pow.base, pow.exponent * &exponent))
            .collect(),
        base => vec![RationalPow::new(base, exponent)],
    }
}

/// Merges components with equal bases by adding their exponents, keeping the order in which
/// each base first appears.
fn merge_bases(components: Vec<RationalPow>) -> Vec<RationalPow> {
    let mut merged: Vec<RationalPow> = Vec::with_capacity(components.len());
    for pow in components {
        match merged.iter_mut().find(|existing| existing.base == pow.base) {
            Some(existing) => existing.exponent += &pow.exponent,
            None => merged.push(pow),
        }
    }
    merged
}

/// Extracts the exact root of `base^exponent`, returning the components it is equal to.
///
/// `b^(p/q)` is computed as the `q`th root of `c = b^|p|`. Each prime factor `f` of `|c|` with
/// multiplicity `m` becomes `f^(m/q)`, a factor of `|c|` too large to factor becomes `r^(1/q)`,
/// and a negative `c` contributes a factor of `(-1)^1`. A negative `c` under an even root is
/// kept as `c^(1/q)`. If `p` is negative, every resulting exponent is negated.
///
/// The component is kept unchanged if `b^|p|` is over [`Limits::max_power_bits`].
///
/// [`Limits::max_power_bits`]: crate::symbolic::simplify::Limits::max_power_bits
fn extract_root(engine: &Engine, base: Integer, exponent: Fraction) -> Vec<RationalPow> {
    if base == 1 {
        return Vec::new();
    }
    if base == 0 || exponent.is_one() {
        return vec![RationalPow::new(Expr::from(base), exponent)];
    }

    let limits = engine.limits();
    let power = exponent.numer().clone().abs()
        .to_u32()
        .filter(|power| limits.allows_power(&base, *power));
    let Some(power) = power else {
        debug!(
            %base,
            %exponent,
            max_bits = limits.max_power_bits,
            "power is too large to evaluate exactly",
        );
        return vec![RationalPow::new(Expr::from(base), exponent)];
    };

    let content = Integer::from((&base).pow(power));
    let sign = if exponent.is_negative() { -1 } else { 1 };
    let root = exponent.denom().clone();

    if root == 1 {
        return vec![RationalPow::new(Expr::from(content), Fraction::from(sign))];
    }
    if root.is_even() && content < 0 {
        return vec![RationalPow::new(Expr::from(content), Fraction::new(int(sign), root))];
    }

    let negative = content < 0;
    let magnitude = content.abs();
    let mut powers = Vec::new();
    if magnitude > 1 {
        let factorization = match engine.primes().factorize(&magnitude) {
            Ok(factorization) => factorization,
            Err(_) => return vec![RationalPow::new(Expr::from(base), exponent)],
        };
        let has_remainder = factorization.has_remainder();
        for (prime, multiplicity) in factorization.prime_factors {
            powers.push(RationalPow::new(
                Expr::from(int(prime)),
                Fraction::new(int(multiplicity) * sign, root.clone()),
            ));
        }
        if has_remainder {
            powers.push(RationalPow::new(
                Expr::from(factorization.remainder),
                Fraction::new(int(sign), root),
            ));
        }
    }
    if negative {
        powers.push(RationalPow::unit(Expr::from(int(-1))));
    }
    powers
}

/// Returns true if an integer base may be multiplied into other integer bases with the same
/// exponent.
///
/// Zero bases are never merged, and neither are negative bases under an even root, since
/// `(-a)^(1/2) * (-b)^(1/2)` is not `(ab)^(1/2)`.
fn is_mergeable(base: &Integer, exponent: &Fraction) -> bool {
    *base > 0 || (*base < 0 && exponent.denom().is_odd())
}

/// Merges integer bases with equal exponents by multiplying the bases together.
fn merge_exponents(components: Vec<RationalPow>) -> Vec<RationalPow> {
    let mut groups: Vec<(Fraction, Integer)> = Vec::new();
    let mut others = Vec::new();
    for RationalPow { base, exponent } in components {
        match base {
            Expr::Primary(Primary::Integer(base)) if is_mergeable(&base, &exponent) => {
                match groups.iter_mut().find(|(existing, _)| *existing == exponent) {
                    Some((_, product)) => *product *= base,
                    None => groups.push((exponent, base)),
                }
            },
            base => others.push(RationalPow::new(base, exponent)),
        }
    }

    groups.into_iter()
        .filter(|(_, product)| *product != 1)
        .map(|(exponent, product)| RationalPow::new(Expr::from(product), exponent))
        .chain(others)
        .collect()
}

/// Converts a normalized list of powers into an expression.
fn collapse(mut powers: Vec<RationalPow>) -> Expr {
    if powers.is_empty() {
        return Expr::from(int(1));
    }

    let is_rational = powers.iter().all(|pow| {
        pow.exponent.is_unit() && pow.base.as_integer().is_some_and(|base| *base != 0)
    });
    if is_rational {
        let value = powers.iter().fold(Fraction::one(), |value, pow| {
            match pow.base.as_integer() {
                Some(base) if pow.exponent.is_positive() => value * base,
                Some(base) => value / base,
                None => value,
            }
        });
        return value.into_expr();
    }

    if powers.len() == 1 {
        let pow = powers.remove(0);
        if pow.exponent.is_one() {
            return pow.base;
        }
        return Expr::from(pow);
    }

    Expr::RationalProduct(powers)
}

/// Multiplies the given real-valued powers together, producing a canonical real-valued
/// expression.
pub(crate) fn rational_product(engine: &Engine, components: Vec<RationalPow>) -> Expr {
    match normalize(engine, components) {
        Normalized::Zero => Expr::from(int(0)),
        Normalized::Powers(powers) => collapse(powers),
    }
}

/// `a^1 = a`
/// `a^0 = 1`
/// `(2/3)^-1 = 3/2`
/// `(a^b)^c = a^(b*c)`, if `b` is rational and `c` is an integer
/// `12^(1/2) = 2 * 3^(1/2)`
///
/// With the distributive strategy, `(a+b)^2 = (a+b)*(a+b)`, expanded.
pub(crate) fn simplify_exponentiation(
    engine: &Engine,
    base: &Expr,
    exp: &Expr,
) -> Option<(Expr, Step)> {
    if engine.strategy() == Strategy::Distribute {
        if let Some(expanded) = distribute::expand_power(engine, base, exp) {
            return Some((expanded, Step::ExpandPower));
        }
    }

    if exp.is_one() {
        return Some((base.clone(), Step::PowerOne));
    }

    if exp.is_zero() {
        return Some((Expr::from(int(1)), Step::PowerZero));
    }

    if base.is_rational() && !base.is_zero() && exp.as_integer().is_some_and(|n| *n == -1) {
        return Some((base.reciprocal_real()?, Step::Reciprocal));
    }

    if base.is_real() {
        let exponent = exp.as_fraction()?;
        let result = rational_product(engine, vec![RationalPow::new(base.clone(), exponent)]);
        return Some((result, Step::RationalPower));
    }

    if let (Expr::Exp(inner_base, inner_exp), Some(n)) = (base, exp.as_integer()) {
        let exponent = Expr::from(inner_exp.as_fraction()? * n);
        let result = simplify_exponentiation(engine, inner_base, &exponent)
            .map(|(result, _)| result)
            .unwrap_or_else(|| Expr::Exp(inner_base.clone(), Box::new(exponent)));
        return Some((result, Step::PowerPower));
    }

    None
}
