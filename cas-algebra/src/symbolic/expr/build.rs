//! Helpers to construct unsimplified expressions.
//!
//! None of these functions perform any simplification; [`rational`] is the only one that
//! normalizes its input, since a [`Primary::Rational`] is always stored in lowest terms.
//! Pass the result to [`simplify`](crate::symbolic::simplify()) to obtain a canonical form.

use crate::primitive::int;
use crate::symbolic::simplify::fraction::Fraction;
use rug::Integer;
use super::{Constant, Expr, Primary, Relation};

/// Creates an integer.
pub fn integer<T>(n: T) -> Expr
where
    Integer: From<T>,
{
    Expr::Primary(Primary::Integer(Integer::from(n)))
}

/// Creates the rational number `numer / denom`, in lowest terms.
///
/// The result is always a [`Primary::Rational`], even if the denominator reduces to 1.
pub fn rational<T, U>(numer: T, denom: U) -> Expr
where
    Integer: From<T> + From<U>,
{
    Expr::Primary(Primary::Rational(Fraction::new(Integer::from(numer), Integer::from(denom))))
}

/// Creates a named variable.
pub fn symbol(name: &str) -> Expr {
    Expr::Primary(Primary::Symbol(name.to_string()))
}

/// The constant `pi`.
pub fn pi() -> Expr {
    Expr::from(Constant::Pi)
}

/// The constant `e`.
pub fn e() -> Expr {
    Expr::from(Constant::E)
}

/// Creates the sum `lhs + rhs`.
pub fn add(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Add(vec![lhs, rhs])
}

/// Creates the product `lhs * rhs`.
pub fn multiply(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Mul(vec![lhs, rhs])
}

/// Creates the difference `lhs - rhs`, as `lhs + (-1 * rhs)`.
pub fn subtract(lhs: Expr, rhs: Expr) -> Expr {
    add(lhs, negate(rhs))
}

/// Creates the quotient `lhs / rhs`, as `lhs * rhs^-1`.
pub fn divide(lhs: Expr, rhs: Expr) -> Expr {
    multiply(lhs, reciprocal(rhs))
}

/// Creates the negation `-1 * expr`.
pub fn negate(expr: Expr) -> Expr {
    multiply(integer(-1), expr)
}

/// Creates the reciprocal `expr^-1`.
pub fn reciprocal(expr: Expr) -> Expr {
    pow(expr, integer(-1))
}

/// Creates the power `base^exp`.
pub fn pow(base: Expr, exp: Expr) -> Expr {
    Expr::Exp(Box::new(base), Box::new(exp))
}

/// Creates a column vector from its rows.
pub fn vector(rows: Vec<Expr>) -> Expr {
    Expr::Vector(rows)
}

/// Creates `gcd(a, b)`.
pub fn gcd(a: Expr, b: Expr) -> Expr {
    Expr::Gcd(Box::new(a), Box::new(b))
}

/// Creates `lcm(a, b)`.
pub fn lcm(a: Expr, b: Expr) -> Expr {
    Expr::Lcm(Box::new(a), Box::new(b))
}

/// Creates the dot product `<a, b>`.
pub fn dot_product(a: Expr, b: Expr) -> Expr {
    Expr::DotProduct(Box::new(a), Box::new(b))
}

/// Applies the undefined function `name` to the given arguments.
pub fn function(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function(name.to_string(), args)
}

/// Creates the comparison `lhs <relation> rhs`.
pub fn compare(lhs: Expr, relation: Relation, rhs: Expr) -> Expr {
    Expr::Compare(Box::new(lhs), relation, Box::new(rhs))
}

/// Creates the equation `lhs = rhs`.
pub fn equation(lhs: Expr, rhs: Expr) -> Expr {
    compare(lhs, Relation::Equal, rhs)
}

/// Creates `|expr|`, as the square root of `expr^2`.
pub fn abs(expr: Expr) -> Expr {
    pow(pow(expr, integer(2)), Expr::from(Fraction::new(int(1), int(2))))
}
