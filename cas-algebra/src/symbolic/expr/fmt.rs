use crate::error::ArgumentError;
use crate::primitive::{check_radix, format_radix};
use std::fmt::{self, Display, Formatter};
use super::{Algorithm, Constant, Expr, Primary, RationalPow};
use crate::symbolic::simplify::fraction::Fraction;

/// Binding strength of an expression when printed, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Compare,
    Add,
    Mul,
    Exp,
    Atom,
}

impl Expr {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Primary(Primary::Integer(n)) if *n < 0 => Precedence::Add,
            Self::Primary(Primary::Rational(f)) if f.is_negative() => Precedence::Add,
            Self::Primary(Primary::Rational(_)) => Precedence::Mul,
            Self::Add(terms) if terms.len() > 1 => Precedence::Add,
            Self::Mul(factors) if factors.len() > 1 => Precedence::Mul,
            Self::RationalProduct(components) if components.len() > 1 => Precedence::Mul,
            Self::Exp(..) | Self::RationalPow(_) => Precedence::Exp,
            Self::Compare(..) => Precedence::Compare,
            _ => Precedence::Atom,
        }
    }

    /// Returns a value that displays this expression with integers written in the given radix.
    ///
    /// Returns [`ArgumentError::InvalidRadix`] if the radix is not between 2 and 64, inclusive.
    pub fn radix(&self, radix: u8) -> Result<Radix<'_>, ArgumentError> {
        Ok(Radix { expr: self, radix: check_radix(radix)? })
    }

    /// Formats this expression with integers written in the given radix.
    ///
    /// Returns [`ArgumentError::InvalidRadix`] if the radix is not between 2 and 64, inclusive.
    pub fn to_string_radix(&self, radix: u8) -> Result<String, ArgumentError> {
        self.radix(radix).map(|radix| radix.to_string())
    }
}

/// Displays an [`Expr`] with integers written in some radix, created by [`Expr::radix`].
#[derive(Debug, Clone, Copy)]
pub struct Radix<'a> {
    expr: &'a Expr,
    radix: u8,
}

impl Radix<'_> {
    fn with<'b>(&self, expr: &'b Expr) -> Radix<'b> {
        Radix { expr, radix: self.radix }
    }

    /// Writes the child expression, wrapped in parentheses if it binds looser than `min`.
    fn child(&self, f: &mut Formatter<'_>, expr: &Expr, min: Precedence) -> fmt::Result {
        if expr.precedence() < min {
            write!(f, "({})", self.with(expr))
        } else {
            write!(f, "{}", self.with(expr))
        }
    }

    fn fraction(&self, f: &mut Formatter<'_>, value: &Fraction) -> fmt::Result {
        write!(f, "{}", format_radix(value.numer(), self.radix))?;
        if !value.is_integer() {
            write!(f, "/{}", format_radix(value.denom(), self.radix))?;
        }
        Ok(())
    }

    fn power(&self, f: &mut Formatter<'_>, pow: &RationalPow) -> fmt::Result {
        // bases that are powers themselves are parenthesized, `(a^b)^c`
        self.child(f, &pow.base, Precedence::Atom)?;
        write!(f, "^")?;
        if pow.exponent.is_integer() && !pow.exponent.is_negative() {
            self.fraction(f, &pow.exponent)
        } else {
            write!(f, "(")?;
            self.fraction(f, &pow.exponent)?;
            write!(f, ")")
        }
    }

    fn list(&self, f: &mut Formatter<'_>, items: &[Expr], separator: &str, min: Precedence) -> fmt::Result {
        let mut iter = items.iter();
        if let Some(item) = iter.next() {
            self.child(f, item, min)?;
            for item in iter {
                write!(f, "{}", separator)?;
                self.child(f, item, min)?;
            }
        }
        Ok(())
    }

    fn binary(&self, f: &mut Formatter<'_>, name: &str, lhs: &Expr, rhs: &Expr) -> fmt::Result {
        write!(f, "{}({}, {})", name, self.with(lhs), self.with(rhs))
    }
}

impl Display for Radix<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.expr {
            Expr::Primary(primary) => match primary {
                Primary::Integer(n) => write!(f, "{}", format_radix(n, self.radix)),
                Primary::Rational(value) => self.fraction(f, value),
                Primary::Constant(Constant::Pi) => write!(f, "pi"),
                Primary::Constant(Constant::E) => write!(f, "e"),
                Primary::Symbol(name) => write!(f, "{}", name),
                Primary::Generated(id) => write!(f, "v[{}]", id.get()),
            },
            Expr::Add(terms) => self.list(f, terms, " + ", Precedence::Add),
            Expr::Mul(factors) => self.list(f, factors, " * ", Precedence::Mul),
            Expr::Exp(base, exp) => {
                self.child(f, base, Precedence::Atom)?;
                write!(f, "^")?;
                self.child(f, exp, Precedence::Atom)
            },
            Expr::RationalPow(pow) => self.power(f, pow),
            Expr::RationalProduct(components) => {
                let mut iter = components.iter();
                if let Some(pow) = iter.next() {
                    self.power(f, pow)?;
                    for pow in iter {
                        write!(f, " * ")?;
                        self.power(f, pow)?;
                    }
                }
                Ok(())
            },
            Expr::Vector(rows) => {
                write!(f, "(")?;
                self.list(f, rows, ", ", Precedence::Add)?;
                write!(f, ")^T")
            },
            Expr::Gcd(a, b) => self.binary(f, "gcd", a, b),
            Expr::Lcm(a, b) => self.binary(f, "lcm", a, b),
            Expr::DotProduct(a, b) => write!(f, "<{}, {}>", self.with(a), self.with(b)),
            Expr::Algorithm(algorithm) => match &**algorithm {
                Algorithm::Eval(expr) => write!(f, "eval({})", self.with(expr)),
                Algorithm::Expand(expr) => write!(f, "expand({})", self.with(expr)),
                Algorithm::Diff { expr, variable, grade } => {
                    write!(f, "diff({}, {}, {})", self.with(expr), self.with(variable), grade)
                },
            },
            Expr::Function(name, args) => {
                write!(f, "{}(", name)?;
                self.list(f, args, ", ", Precedence::Compare)?;
                write!(f, ")")
            },
            Expr::Compare(lhs, relation, rhs) => {
                self.child(f, lhs, Precedence::Add)?;
                write!(f, " {} ", relation.symbol())?;
                self.child(f, rhs, Precedence::Add)
            },
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Radix { expr: self, radix: 10 })
    }
}
