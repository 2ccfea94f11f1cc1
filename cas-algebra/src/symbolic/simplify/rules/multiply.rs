//! Multiplication of simplified factors, including combining like factors.

use crate::primitive::int;
use crate::symbolic::expr::{Expr, RationalPow};
use crate::symbolic::simplify::{fraction::Fraction, Engine, Strategy};
use super::distribute;

/// Accumulates factors to be multiplied together.
///
/// Real-valued factors are collected into a single product of powers, vectors are kept aside to
/// be scaled by that product, and every other factor is grouped with the factors that share its
/// base, so that `x * x^2` becomes `x^3`.
///
/// With the [`Strategy::Distribute`] strategy, sums are kept aside as well, and the finished
/// product is distributed over them.
pub(crate) struct Multiplier<'e> {
    engine: &'e Engine,
    reals: Vec<RationalPow>,
    vectors: Vec<Vec<Expr>>,
    others: Vec<(Expr, Fraction)>,
    additions: Vec<Vec<Expr>>,
}

impl<'e> Multiplier<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            reals: Vec::new(),
            vectors: Vec::new(),
            others: Vec::new(),
            additions: Vec::new(),
        }
    }

    /// Multiplies by a factor.
    pub(crate) fn push(&mut self, factor: Expr) {
        match factor {
            Expr::RationalPow(pow) => self.reals.push(*pow),
            factor if factor.is_real() => self.reals.push(RationalPow::unit(factor)),
            Expr::Vector(rows) => self.vectors.push(rows),
            Expr::Mul(factors) => {
                for factor in factors {
                    self.push(factor);
                }
            },
            Expr::Add(terms) if self.engine.strategy() == Strategy::Distribute => {
                self.additions.push(terms);
            },
            other => self.push_other(other),
        }
    }

    /// Groups a factor with the factors that have the same base.
    fn push_other(&mut self, factor: Expr) {
        let (base, exponent) = match factor {
            Expr::Exp(base, exp) => match exp.as_fraction() {
                Some(exponent) => (*base, exponent),
                None => (Expr::Exp(base, exp), Fraction::one()),
            },
            other => (other, Fraction::one()),
        };

        match self.others.iter_mut().find(|(existing, _)| *existing == base) {
            Some((_, total)) => *total += &exponent,
            None => self.others.push((base, exponent)),
        }
    }

    /// Builds the product.
    ///
    /// The real-valued part of the product comes first, unless there are vectors, in which case
    /// the first vector is scaled by it instead. Vectors come last.
    pub(crate) fn finish(self) -> Expr {
        let Multiplier { engine, reals, vectors, others, additions } = self;

        let product = engine.rational_product(reals);
        if product.is_zero() {
            return Expr::from(int(0));
        }

        let mut factors = others.into_iter()
            .filter_map(|(base, exponent)| {
                if exponent.is_zero() {
                    None
                } else if exponent.is_one() {
                    Some(base)
                } else {
                    Some(Expr::Exp(Box::new(base), Box::new(exponent.into_expr())))
                }
            })
            .collect::<Vec<_>>();

        let mut vectors = vectors.into_iter();
        if !product.is_one() {
            match vectors.next() {
                Some(rows) => {
                    let scaled = rows.into_iter()
                        .map(|row| engine.simplify_multiplication([row, product.clone()]))
                        .collect();
                    factors.push(Expr::Vector(scaled));
                },
                None => factors.insert(0, product),
            }
        }
        factors.extend(vectors.map(Expr::Vector));

        let result = Expr::Mul(factors).downgrade();
        if additions.is_empty() {
            result
        } else {
            distribute::expand_product(engine, additions, result)
        }
    }
}
