//! Symbolic differentiation.

use crate::error::DerivativeError;
use crate::primitive::int;
use crate::symbolic::expr::{Constant, Expr, Primary};
use crate::symbolic::simplify::{fraction::Fraction, Engine};

/// Returns `true` if the given [`Expr`] is "clearly" zero. This is intended to clean up
/// intermediate results and is not mathematically rigorous.
fn is_trivially_zero(e: &Expr) -> bool {
    match e {
        Expr::Primary(_) => e.is_zero(),
        Expr::Add(terms) => terms.iter().all(is_trivially_zero),
        Expr::Mul(factors) => factors.iter().any(is_trivially_zero),
        _ => false,
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" one. This is intended to clean up
/// intermediate results and is not mathematically rigorous.
fn is_trivially_one(e: &Expr) -> bool {
    match e {
        Expr::Primary(_) => e.is_one(),
        Expr::Mul(factors) => factors.iter().all(is_trivially_one),
        Expr::Exp(base, exp) => is_trivially_zero(exp) || is_trivially_one(base),
        Expr::Add(terms) => terms.len() == 1 && is_trivially_one(&terms[0]),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder(Vec<Expr>);

impl From<MultBuilder> for Expr {
    fn from(value: MultBuilder) -> Self {
        Expr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    fn mult(&mut self, e: Expr) {
        if self.0.first().is_some_and(is_trivially_zero) {
            return;
        }

        if is_trivially_zero(&e) {
            self.0 = vec![Expr::from(int(0))];
        } else if !is_trivially_one(&e) {
            self.0.push(e);
        }
    }
}

/// Helper struct to build a sum of expressions while applying basic simplification rules. Only
/// non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl From<SumBuilder> for Expr {
    fn from(value: SumBuilder) -> Self {
        Expr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    fn add(&mut self, e: Expr) {
        if !is_trivially_zero(&e) {
            self.0.push(e);
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[Expr], variable: &Expr) -> Result<Expr, DerivativeError> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(first_derivative(term, variable)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(factors: &[Expr], variable: &Expr) -> Result<Expr, DerivativeError> {
    let mut outer_sum = SumBuilder::default();
    for derivative_index in 0..factors.len() {
        let mut inner_mult = MultBuilder::default();
        for (index, factor) in factors.iter().enumerate() {
            if index == derivative_index {
                inner_mult.mult(first_derivative(factor, variable)?);
            } else {
                inner_mult.mult(factor.clone());
            }
        }
        outer_sum.add(inner_mult.into());
    }
    Ok(outer_sum.into())
}

/// `(f^n)' = n * f^(n-1) * f'`, for a rational `n`.
fn power_rule(base: &Expr, n: Fraction, variable: &Expr) -> Result<Expr, DerivativeError> {
    let mut mult = MultBuilder::default();
    let lowered = n.clone() + &Fraction::from(-1);
    mult.mult(n.into_expr());
    mult.mult(Expr::Exp(Box::new(base.clone()), Box::new(lowered.into_expr())));
    mult.mult(first_derivative(base, variable)?);
    Ok(mult.into())
}

/// Computes the first derivative of the expression with respect to the given variable, without
/// simplifying the result.
fn first_derivative(expr: &Expr, variable: &Expr) -> Result<Expr, DerivativeError> {
    if !expr.contains(variable) {
        return Ok(Expr::from(int(0)));
    }
    if expr == variable {
        return Ok(Expr::from(int(1)));
    }

    match expr {
        Expr::Add(terms) => sum_rule(terms, variable),
        Expr::Mul(factors) => product_rule(factors, variable),
        Expr::Exp(base, exp) => match (&**base, exp.as_fraction()) {
            (_, Some(n)) => power_rule(base, n, variable),

            // `(e^u)' = e^u * u'`
            (Expr::Primary(Primary::Constant(Constant::E)), None) => {
                let mut mult = MultBuilder::default();
                mult.mult(expr.clone());
                mult.mult(first_derivative(exp, variable)?);
                Ok(mult.into())
            },
            _ => Err(DerivativeError::Unsupported(expr.clone())),
        },
        Expr::RationalPow(pow) => power_rule(&pow.base, pow.exponent.clone(), variable),
        Expr::RationalProduct(components) => {
            let factors = components.iter()
                .cloned()
                .map(Expr::from)
                .collect::<Vec<_>>();
            product_rule(&factors, variable)
        },
        Expr::Vector(rows) => rows.iter()
            .map(|row| first_derivative(row, variable))
            .collect::<Result<Vec<_>, _>>()
            .map(Expr::Vector),
        Expr::Algorithm(algorithm) => {
            let evaluated = algorithm.evaluate();
            if matches!(&evaluated, Expr::Algorithm(inner) if inner == algorithm) {
                Err(DerivativeError::Unsupported(expr.clone()))
            } else {
                first_derivative(&evaluated, variable)
            }
        },
        _ => Err(DerivativeError::Unsupported(expr.clone())),
    }
}

/// Computes the `grade`th derivative of the given expression with respect to `variable`.
///
/// The expression is simplified before differentiating, and after each derivative is taken.
/// Returns [`Err`] if the derivative could not be computed symbolically.
pub fn derivative(expr: &Expr, variable: &Expr, grade: u32) -> Result<Expr, DerivativeError> {
    let engine = Engine::evaluating();
    let mut current = engine.simplify(expr);
    for _ in 0..grade {
        current = engine.simplify(&first_derivative(&current, variable)?);
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use crate::symbolic::expr::{build::*, Algorithm};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn polynomial() {
        let x = symbol("x");
        let expr = add(
            add(pow(x.clone(), integer(2)), multiply(integer(3), x.clone())),
            integer(1),
        );
        assert_eq!(
            derivative(&expr, &x, 1),
            Ok(add(multiply(integer(2), x), integer(3))),
        );
    }

    #[test]
    fn higher_grades() {
        let x = symbol("x");
        let cube = pow(x.clone(), integer(3));
        assert_eq!(derivative(&cube, &x, 2), Ok(multiply(integer(6), x.clone())));
        assert_eq!(derivative(&cube, &x, 3), Ok(integer(6)));
        assert_eq!(derivative(&cube, &x, 4), Ok(integer(0)));
        assert_eq!(derivative(&cube, &x, 0), Ok(cube));
    }

    #[test]
    fn constants() {
        let x = symbol("x");
        assert_eq!(derivative(&symbol("y"), &x, 1), Ok(integer(0)));
        assert_eq!(derivative(&pi(), &x, 1), Ok(integer(0)));
        assert_eq!(derivative(&x, &x, 1), Ok(integer(1)));
    }

    #[test]
    fn product_with_exponential() {
        let x = symbol("x");
        let exp_x = pow(e(), x.clone());
        assert_eq!(derivative(&exp_x, &x, 1), Ok(exp_x.clone()));
        assert_eq!(
            derivative(&multiply(x.clone(), exp_x.clone()), &x, 1),
            Ok(add(exp_x.clone(), multiply(x, exp_x))),
        );
    }

    #[test]
    fn chain_rule() {
        let x = symbol("x");
        let inner = add(pow(x.clone(), integer(2)), integer(1));
        let expr = pow(inner.clone(), rational(1, 2));
        assert_eq!(
            derivative(&expr, &x, 1),
            Ok(multiply(pow(inner, rational(-1, 2)), x)),
        );
    }

    #[test]
    fn vectors() {
        let x = symbol("x");
        let expr = vector(vec![pow(x.clone(), integer(2)), x.clone(), integer(4)]);
        assert_eq!(
            derivative(&expr, &x, 1),
            Ok(vector(vec![multiply(integer(2), x), integer(1), integer(0)])),
        );
    }

    #[test]
    fn unsupported() {
        let x = symbol("x");
        let expr = gcd(x.clone(), integer(2));
        assert_eq!(
            derivative(&expr, &x, 1),
            Err(DerivativeError::Unsupported(expr.clone())),
        );
        assert_eq!(
            DerivativeError::Unsupported(expr).to_string(),
            "cannot differentiate gcd(x, 2)",
        );

        let f = function("f", vec![x.clone()]);
        assert_eq!(derivative(&f, &x, 1), Err(DerivativeError::Unsupported(f.clone())));
        assert_eq!(derivative(&f, &symbol("y"), 1), Ok(integer(0)));

        let tower = pow(x.clone(), x.clone());
        assert_eq!(derivative(&tower, &x, 1), Err(DerivativeError::Unsupported(tower)));
    }

    #[test]
    fn algorithms_are_evaluated_first() {
        let x = symbol("x");
        let a = symbol("a");
        let expr = Expr::from(Algorithm::Expand(multiply(x.clone(), add(x.clone(), a.clone()))));
        assert_eq!(
            derivative(&expr, &x, 1),
            Ok(add(multiply(integer(2), x), a)),
        );
    }
}
