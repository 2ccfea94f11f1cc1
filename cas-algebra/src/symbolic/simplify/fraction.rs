//! Exact rational arithmetic.

use crate::primitive::int;
use crate::symbolic::expr::{Expr, Primary};
use rug::Integer;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg};

/// An exact fraction of two [`Integer`]s.
///
/// A [`Fraction`] is always in lowest terms: the denominator is never negative, and the
/// numerator and denominator share no common factor. Zero is always represented as `0/1`.
///
/// Arithmetic never fails. Dividing by zero produces a fraction with a zero denominator, which
/// the simplification engine is careful never to turn into an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fraction {
    numer: Integer,
    denom: Integer,
}

impl Fraction {
    /// Creates a new fraction, reduced to lowest terms.
    pub fn new(numer: Integer, denom: Integer) -> Self {
        Self { numer, denom }.normalize()
    }

    /// Creates a fraction with a denominator of 1.
    pub fn from_integer(n: Integer) -> Self {
        Self { numer: n, denom: int(1) }
    }

    /// The fraction `0/1`.
    pub fn zero() -> Self {
        Self::from_integer(int(0))
    }

    /// The fraction `1/1`.
    pub fn one() -> Self {
        Self::from_integer(int(1))
    }

    /// Reduces the fraction to lowest terms, with a non-negative denominator.
    pub fn normalize(mut self) -> Self {
        if self.numer == 0 {
            return Self::zero();
        }

        if self.denom < 0 {
            self.numer = -self.numer;
            self.denom = -self.denom;
        }

        // the numerator is non-zero, so the gcd is at least 1
        let gcd = Integer::from(self.numer.gcd_ref(&self.denom));
        if gcd != 1 {
            self.numer.div_exact_mut(&gcd);
            self.denom.div_exact_mut(&gcd);
        }
        self
    }

    pub fn numer(&self) -> &Integer {
        &self.numer
    }

    pub fn denom(&self) -> &Integer {
        &self.denom
    }

    pub fn into_numer_denom(self) -> (Integer, Integer) {
        (self.numer, self.denom)
    }

    pub fn is_zero(&self) -> bool {
        self.numer == 0
    }

    pub fn is_one(&self) -> bool {
        self.numer == 1 && self.denom == 1
    }

    /// Returns true if the denominator is 1.
    pub fn is_integer(&self) -> bool {
        self.denom == 1
    }

    pub fn is_positive(&self) -> bool {
        self.numer > 0
    }

    pub fn is_negative(&self) -> bool {
        self.numer < 0
    }

    /// Returns true if the absolute value of the fraction is 1.
    pub fn is_unit(&self) -> bool {
        self.denom == 1 && (self.numer == 1 || self.numer == -1)
    }

    pub fn abs(self) -> Self {
        Self { numer: self.numer.abs(), denom: self.denom }
    }

    /// Swaps the numerator and denominator.
    pub fn recip(self) -> Self {
        Self::new(self.denom, self.numer)
    }

    /// Converts the fraction into an [`Expr::Primary`], as a [`Primary::Integer`] if the
    /// denominator is 1, or a [`Primary::Rational`] otherwise.
    pub fn into_expr(self) -> Expr {
        if self.is_integer() {
            Expr::Primary(Primary::Integer(self.numer))
        } else {
            Expr::Primary(Primary::Rational(self))
        }
    }
}

impl From<Integer> for Fraction {
    fn from(n: Integer) -> Self {
        Self::from_integer(n)
    }
}

impl From<i32> for Fraction {
    fn from(n: i32) -> Self {
        Self::from_integer(int(n))
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl Add<&Fraction> for Fraction {
    type Output = Fraction;

    fn add(self, rhs: &Fraction) -> Fraction {
        let numer = self.numer * &rhs.denom + Integer::from(&rhs.numer * &self.denom);
        Fraction::new(numer, self.denom * &rhs.denom)
    }
}

impl Add<&Integer> for Fraction {
    type Output = Fraction;

    fn add(self, rhs: &Integer) -> Fraction {
        let numer = self.numer + Integer::from(rhs * &self.denom);
        Fraction::new(numer, self.denom)
    }
}

impl AddAssign<&Fraction> for Fraction {
    fn add_assign(&mut self, rhs: &Fraction) {
        *self = std::mem::take(self) + rhs;
    }
}

impl Mul<&Fraction> for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &Fraction) -> Fraction {
        Fraction::new(self.numer * &rhs.numer, self.denom * &rhs.denom)
    }
}

impl Mul<&Integer> for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &Integer) -> Fraction {
        Fraction::new(self.numer * rhs, self.denom)
    }
}

impl MulAssign<&Fraction> for Fraction {
    fn mul_assign(&mut self, rhs: &Fraction) {
        *self = std::mem::take(self) * rhs;
    }
}

impl Div<&Fraction> for Fraction {
    type Output = Fraction;

    fn div(self, rhs: &Fraction) -> Fraction {
        Fraction::new(self.numer * &rhs.denom, self.denom * &rhs.numer)
    }
}

impl Div<&Integer> for Fraction {
    type Output = Fraction;

    fn div(self, rhs: &Integer) -> Fraction {
        Fraction::new(self.numer, self.denom * rhs)
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction { numer: -self.numer, denom: self.denom }
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}
