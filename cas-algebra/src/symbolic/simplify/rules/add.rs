//! Addition of simplified terms, including combining like terms.

use crate::symbolic::expr::{Expr, Primary, RationalPow};
use crate::symbolic::simplify::{fraction::Fraction, Engine};
use rug::{ops::Pow, Integer};

/// Accumulates terms to be added together.
///
/// Numbers are added into a single constant, vectors of the same dimension are added row by row,
/// and every other term is kept aside until [`Adder::finish`] combines like terms.
pub(crate) struct Adder<'e> {
    engine: &'e Engine,
    constant: Fraction,
    addends: Vec<Expr>,
}

impl<'e> Adder<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            constant: Fraction::zero(),
            addends: Vec::new(),
        }
    }

    /// Adds a term.
    pub(crate) fn push(&mut self, term: Expr) {
        match term {
            Expr::Primary(Primary::Integer(n)) => self.constant += &Fraction::from(n),
            Expr::Primary(Primary::Rational(value)) => self.constant += &value,
            Expr::Vector(rows) => self.push_vector(rows),
            Expr::RationalPow(_) | Expr::RationalProduct(_) => {
                let normalized = self.engine.renormalize(term);
                if matches!(normalized, Expr::RationalPow(_) | Expr::RationalProduct(_)) {
                    self.addends.push(normalized);
                } else {
                    self.push(normalized);
                }
            },
            Expr::Add(terms) => {
                for term in terms {
                    self.push(term);
                }
            },
            other => self.addends.push(other),
        }
    }

    /// Adds a vector to the first vector term with the same number of rows, or keeps it as a new
    /// term if there is none.
    fn push_vector(&mut self, rows: Vec<Expr>) {
        let engine = self.engine;
        let compatible = self.addends.iter_mut().find_map(|addend| match addend {
            Expr::Vector(existing) if existing.len() == rows.len() => Some(existing),
            _ => None,
        });

        match compatible {
            Some(existing) => {
                let sum = existing.iter()
                    .zip(rows)
                    .map(|(lhs, rhs)| engine.simplify_addition([lhs.clone(), rhs]))
                    .collect();
                *existing = sum;
            },
            None => self.addends.push(Expr::Vector(rows)),
        }
    }

    /// Combines like terms and builds the sum.
    ///
    /// Terms are like terms if they are equal after their rational coefficients are removed.
    /// Like terms whose coefficients add to zero vanish. The constant, if nonzero, is the last
    /// term of the sum.
    pub(crate) fn finish(self) -> Expr {
        let Adder { engine, mut constant, addends } = self;

        let mut like_terms: Vec<(Expr, Fraction)> = Vec::with_capacity(addends.len());
        for addend in addends {
            let (coefficient, key) = split_coefficient(engine, addend);
            match like_terms.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, total)) => *total += &coefficient,
                None => like_terms.push((key, coefficient)),
            }
        }

        let mut terms = Vec::with_capacity(like_terms.len() + 1);
        for (key, coefficient) in like_terms {
            if coefficient.is_zero() {
                continue;
            }

            let term = if coefficient.is_one() {
                key
            } else {
                engine.simplify_multiplication([coefficient.into_expr(), key])
            };

            match term.as_fraction() {
                Some(value) => constant += &value,
                None => terms.push(term),
            }
        }

        if !constant.is_zero() {
            terms.push(constant.into_expr());
        }

        Expr::Add(terms).downgrade()
    }
}

/// Splits `b^(k + r)`, where `b` is a nonzero integer, `k` is an integer and `0 <= r < 1`, into
/// the rational number `b^k` and the remaining power `b^r`, if any.
///
/// Returns [`None`] if `k` is zero, or if `b^k` is too large to evaluate.
fn integer_part(engine: &Engine, pow: &RationalPow) -> Option<(Fraction, Option<RationalPow>)> {
    let base = pow.base.as_integer().filter(|base| **base != 0)?;
    let (whole, rest) = pow.exponent.numer().clone()
        .div_rem_floor(pow.exponent.denom().clone());
    if whole == 0 {
        return None;
    }

    let power = whole.clone().abs().to_u32()?;
    if !engine.limits().allows_power(base, power) {
        return None;
    }

    let magnitude = Fraction::from(Integer::from(base.pow(power)));
    let value = if whole < 0 { magnitude.recip() } else { magnitude };
    let remainder = (rest != 0).then(|| {
        RationalPow::new(pow.base.clone(), Fraction::new(rest, pow.exponent.denom().clone()))
    });
    Some((value, remainder))
}

/// Moves the rational part of a product of powers into a coefficient.
///
/// `2^1 * 3^(3/2) * pi` -> `(6, [3^(1/2), pi])`
///
/// Returns [`None`] if there is no rational part.
fn split_powers(engine: &Engine, components: &[RationalPow]) -> Option<(Fraction, Vec<RationalPow>)> {
    let mut coefficient = Fraction::one();
    let mut rest = Vec::with_capacity(components.len());
    let mut found = false;
    for pow in components {
        match integer_part(engine, pow) {
            Some((value, remainder)) => {
                found = true;
                coefficient *= &value;
                rest.extend(remainder);
            },
            None => rest.push(pow.clone()),
        }
    }

    found.then_some((coefficient, rest))
}

/// Splits a term into its rational coefficient and the rest of the term, which is used to find
/// like terms.
///
/// - `x` -> `(1, x)`
/// - `3*x*y` -> `(3, x*y)`
/// - `2^(3/2)*x` -> `(2, 2^(1/2)*x)`
/// - `5*pi^-1` -> `(5, pi^-1)`
fn split_coefficient(engine: &Engine, term: Expr) -> (Fraction, Expr) {
    match term {
        Expr::Mul(factors) => {
            let mut coefficient = Fraction::one();
            let mut rest = Vec::with_capacity(factors.len());
            let mut found = false;
            for factor in &factors {
                if let Some(value) = factor.as_fraction() {
                    found = true;
                    coefficient *= &value;
                    continue;
                }

                let powers = match factor {
                    Expr::RationalPow(pow) => std::slice::from_ref(&**pow),
                    Expr::RationalProduct(components) => components.as_slice(),
                    _ => {
                        rest.push(factor.clone());
                        continue;
                    },
                };

                match split_powers(engine, powers) {
                    Some((value, remaining)) => {
                        found = true;
                        coefficient *= &value;
                        rest.extend(remaining.into_iter().map(Expr::from));
                    },
                    None => rest.push(factor.clone()),
                }
            }

            if found {
                (coefficient, engine.simplify_multiplication(rest))
            } else {
                (Fraction::one(), Expr::Mul(factors))
            }
        },
        Expr::RationalPow(_) | Expr::RationalProduct(_) => {
            let split = match &term {
                Expr::RationalPow(pow) => split_powers(engine, std::slice::from_ref(&**pow)),
                Expr::RationalProduct(components) => split_powers(engine, components),
                _ => None,
            };
            match split {
                Some((coefficient, remaining)) => (coefficient, engine.rational_product(remaining)),
                None => (Fraction::one(), term),
            }
        },
        term => (Fraction::one(), term),
    }
}
