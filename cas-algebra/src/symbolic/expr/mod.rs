//! The expression tree manipulated by the simplification engine.
//!
//! An [`Expr`] is an immutable tree. Sums and products are stored **flattened**: the expression
//! `x + (y + z)` is a single [`Expr::Add`] node with three terms, which makes it easy to find and
//! combine like terms. Every rewrite of an expression produces a new tree, leaving the input
//! untouched.
//!
//! # Real-valued nodes
//!
//! Integers, rationals, the irrational [`Constant`]s, [`Expr::RationalPow`] and
//! [`Expr::RationalProduct`] are _real-valued_: they denote a single real number, and
//! [`Expr::is_real`] returns true for them. Real-valued nodes are the ones the engine knows how to
//! multiply exactly, by collecting them into a product of powers with rational exponents.
//!
//! # Strict equality
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`Expr`] implement **strict equality**, a
//! structural equality that is cheap to compute and never reports a false positive. Two
//! expressions are strictly equal if:
//!
//! - Both are numbers with the same value, whether they are stored as a [`Primary::Integer`] or
//! a [`Primary::Rational`].
//! - Both are [`Expr::Add`], or both are products ([`Expr::Mul`] or [`Expr::RationalProduct`]),
//! with strictly equal terms / factors, in any order.
//! - Both are powers ([`Expr::Exp`] or [`Expr::RationalPow`]) with strictly equal bases and
//! exponents.
//! - Both are the same kind of any other node, with strictly equal children in the same order.
//! Functions must also have the same name, and comparisons the same [`Relation`].
//!
//! [`Hash`] agrees with strict equality, so an [`Expr`] can be used as a key in hash maps.

pub mod algorithm;
pub mod build;
mod fmt;
mod iter;
pub mod visit;

use crate::primitive::int;
use crate::symbolic::simplify::fraction::Fraction;
use iter::ExprIter;
use rug::Integer;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::atomic::{AtomicU64, Ordering};

pub use algorithm::Algorithm;
pub use fmt::Radix;
pub use visit::{Entrance, Visitor};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(1);

/// The identity of a generated variable.
///
/// Every call to [`VarId::fresh`] returns an id that has never been returned before in this
/// process, so generated variables from different contexts never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    /// Returns a new, process-unique id.
    pub fn fresh() -> Self {
        Self(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// An irrational constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// The ratio of a circle's circumference to its diameter.
    Pi,

    /// Euler's number.
    E,
}

/// The relation asserted by an [`Expr::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl Relation {
    /// The operator written between the two sides.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
        }
    }
}

/// The sign of a real number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
    Zero,
}

impl Sign {
    /// Returns the sign of the given integer.
    pub fn of(n: &Integer) -> Self {
        match n.cmp0() {
            std::cmp::Ordering::Greater => Self::Positive,
            std::cmp::Ordering::Less => Self::Negative,
            std::cmp::Ordering::Equal => Self::Zero,
        }
    }

    /// Returns the opposite sign. Zero stays zero.
    pub fn inverse(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
            Self::Zero => Self::Zero,
        }
    }

    /// Returns the sign of the product of two numbers with these signs.
    pub fn multiply(self, other: Self) -> Self {
        match (self, other) {
            (Self::Zero, _) | (_, Self::Zero) => Self::Zero,
            (lhs, rhs) if lhs == rhs => Self::Positive,
            _ => Self::Negative,
        }
    }
}

/// A single term / factor that has no children.
#[derive(Debug, Clone)]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A rational number, such as `1/2`, always in lowest terms.
    Rational(Fraction),

    /// An irrational constant, such as `pi`.
    Constant(Constant),

    /// A named variable, such as `x` or `y`.
    Symbol(String),

    /// A variable created by the program, identified only by its [`VarId`].
    Generated(VarId),
}

impl Primary {
    /// If this is a number, returns it as a [`Fraction`].
    pub fn as_fraction(&self) -> Option<Fraction> {
        match self {
            Self::Integer(n) => Some(Fraction::from_integer(n.clone())),
            Self::Rational(f) => Some(f.clone()),
            _ => None,
        }
    }

    /// Returns the sign of the value, if it is a real number.
    pub fn sign(&self) -> Option<Sign> {
        match self {
            Self::Integer(n) => Some(Sign::of(n)),
            Self::Rational(f) => Some(Sign::of(f.numer())),
            Self::Constant(_) => Some(Sign::Positive),
            Self::Symbol(_) | Self::Generated(_) => None,
        }
    }
}

/// Tags written by the [`Hash`] implementations, shared between variants that can compare equal.
mod tag {
    pub const NUMBER: u8 = 0;
    pub const CONSTANT: u8 = 1;
    pub const SYMBOL: u8 = 2;
    pub const GENERATED: u8 = 3;
    pub const PRIMARY: u8 = 4;
    pub const ADD: u8 = 5;
    pub const MUL: u8 = 6;
    pub const EXP: u8 = 7;
    pub const VECTOR: u8 = 8;
    pub const GCD: u8 = 9;
    pub const LCM: u8 = 10;
    pub const DOT_PRODUCT: u8 = 11;
    pub const ALGORITHM: u8 = 12;
    pub const FUNCTION: u8 = 13;
    pub const COMPARE: u8 = 14;
}

/// Hashes a number so that integers and rationals with a denominator of 1 hash equally.
fn hash_number<H: Hasher>(numer: &Integer, denom: Option<&Integer>, state: &mut H) {
    tag::NUMBER.hash(state);
    numer.hash(state);
    if let Some(denom) = denom.filter(|denom| **denom != 1) {
        denom.hash(state);
    }
}

/// Hashes a list of items independently of their order.
fn hash_unordered<'a, T, H>(items: impl ExactSizeIterator<Item = &'a T>, state: &mut H)
where
    T: Hash + 'a,
    H: Hasher,
{
    items.len().hash(state);
    let combined = items.fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    });
    combined.hash(state);
}

impl Hash for Primary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Integer(n) => hash_number(n, None, state),
            Self::Rational(f) => hash_number(f.numer(), Some(f.denom()), state),
            Self::Constant(c) => {
                tag::CONSTANT.hash(state);
                c.hash(state);
            },
            Self::Symbol(name) => {
                tag::SYMBOL.hash(state);
                name.hash(state);
            },
            Self::Generated(id) => {
                tag::GENERATED.hash(state);
                id.hash(state);
            },
        }
    }
}

/// Numbers are equal if their values are equal, regardless of whether they are stored as a
/// [`Primary::Integer`] or a [`Primary::Rational`].
impl PartialEq for Primary {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(lhs), Self::Integer(rhs)) => lhs == rhs,
            (Self::Integer(n), Self::Rational(f)) | (Self::Rational(f), Self::Integer(n)) => {
                f.is_integer() && f.numer() == n
            },
            (Self::Rational(lhs), Self::Rational(rhs)) => lhs == rhs,
            (Self::Constant(lhs), Self::Constant(rhs)) => lhs == rhs,
            (Self::Symbol(lhs), Self::Symbol(rhs)) => lhs == rhs,
            (Self::Generated(lhs), Self::Generated(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl Eq for Primary {}

/// A real-valued base raised to an exact rational exponent.
///
/// Products of these are the canonical form the engine uses for real numbers that are not
/// rational, such as `2^(1/2)` or `pi^-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalPow {
    pub base: Expr,
    pub exponent: Fraction,
}

impl RationalPow {
    pub fn new(base: Expr, exponent: Fraction) -> Self {
        Self { base, exponent }
    }

    /// Wraps a real-valued expression as itself raised to the power of 1.
    pub fn unit(base: Expr) -> Self {
        Self::new(base, Fraction::one())
    }

    /// Returns the sign of the power.
    ///
    /// A negative base raised to an integer exponent is positive or negative depending on the
    /// parity of the exponent. A root of a negative base is assumed to be positive.
    pub fn sign(&self) -> Option<Sign> {
        let base_sign = self.base.sign()?;
        if base_sign != Sign::Negative {
            return Some(base_sign);
        }

        if self.exponent.is_integer() && self.exponent.numer().is_odd() {
            Some(Sign::Negative)
        } else {
            Some(Sign::Positive)
        }
    }

    /// Returns the reciprocal of this power, negating the exponent.
    pub fn reciprocal(&self) -> Self {
        Self::new(self.base.clone(), -self.exponent.clone())
    }

    /// Returns true if the given expression is a number equal to this power's exponent.
    fn exponent_eq(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Primary(Primary::Integer(n)) => {
                self.exponent.is_integer() && self.exponent.numer() == n
            },
            Expr::Primary(Primary::Rational(f)) => self.exponent == *f,
            _ => false,
        }
    }
}

/// Hashes the same way as an equivalent [`Expr::Exp`].
impl Hash for RationalPow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        tag::EXP.hash(state);
        self.base.hash(state);
        tag::PRIMARY.hash(state);
        hash_number(self.exponent.numer(), Some(self.exponent.denom()), state);
    }
}

impl PartialEq<Expr> for RationalPow {
    fn eq(&self, other: &Expr) -> bool {
        match other {
            Expr::RationalPow(pow) => self == &**pow,
            Expr::Exp(base, exp) => self.base == **base && self.exponent_eq(exp),
            _ => false,
        }
    }
}

/// A mathematical expression.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone)]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Exp(Box<Expr>, Box<Expr>),

    /// A real-valued expression raised to an exact rational power.
    RationalPow(Box<RationalPow>),

    /// A product of real-valued powers with rational exponents.
    ///
    /// When produced by the engine, no component has a base that is a rational number, a power,
    /// or another product. No component has a base of 1 or an exponent of 0.
    RationalProduct(Vec<RationalPow>),

    /// A column vector with a fixed number of rows.
    Vector(Vec<Expr>),

    /// The greatest common divisor of two expressions.
    Gcd(Box<Expr>, Box<Expr>),

    /// The least common multiple of two expressions.
    Lcm(Box<Expr>, Box<Expr>),

    /// The dot product of two expressions.
    DotProduct(Box<Expr>, Box<Expr>),

    /// A deferred computation, performed by [`Algorithm::evaluate`].
    Algorithm(Box<Algorithm>),

    /// An undefined function applied to arguments, such as `f(x, 2)`.
    ///
    /// The engine simplifies the arguments, but knows nothing about the function itself.
    Function(String, Vec<Expr>),

    /// A comparison between two expressions, such as `x + 1 < 3`. Both sides are simplified
    /// independently, and the comparison is never decided.
    Compare(Box<Expr>, Relation, Box<Expr>),
}

/// Returns true if both lists contain the same elements, in any order.
fn same_elements<A, B>(lhs: &[A], rhs: &[B], eq: impl Fn(&A, &B) -> bool) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut matched = vec![false; rhs.len()];
    for item in lhs {
        let found = rhs.iter()
            .enumerate()
            .position(|(i, other)| !matched[i] && eq(item, other));
        match found {
            Some(i) => matched[i] = true,
            None => return false,
        }
    }
    true
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                same_elements(lhs, rhs, |a, b| a == b)
            },
            (Self::RationalProduct(lhs), Self::RationalProduct(rhs)) => {
                same_elements(lhs, rhs, |a, b| a == b)
            },
            (Self::RationalProduct(components), Self::Mul(factors))
                | (Self::Mul(factors), Self::RationalProduct(components)) => {
                same_elements(components, factors, |a, b| a == b)
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            (Self::RationalPow(pow), other @ (Self::RationalPow(_) | Self::Exp(..)))
                | (other @ Self::Exp(..), Self::RationalPow(pow)) => **pow == *other,
            (Self::Vector(lhs), Self::Vector(rhs)) => lhs == rhs,
            (Self::Gcd(lhs_a, lhs_b), Self::Gcd(rhs_a, rhs_b))
                | (Self::Lcm(lhs_a, lhs_b), Self::Lcm(rhs_a, rhs_b))
                | (Self::DotProduct(lhs_a, lhs_b), Self::DotProduct(rhs_a, rhs_b)) => {
                lhs_a == rhs_a && lhs_b == rhs_b
            },
            (Self::Algorithm(lhs), Self::Algorithm(rhs)) => lhs == rhs,
            (Self::Function(lhs_name, lhs_args), Self::Function(rhs_name, rhs_args)) => {
                lhs_name == rhs_name && lhs_args == rhs_args
            },
            (Self::Compare(lhs_a, lhs_rel, lhs_b), Self::Compare(rhs_a, rhs_rel, rhs_b)) => {
                lhs_rel == rhs_rel && lhs_a == rhs_a && lhs_b == rhs_b
            },
            _ => false,
        }
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Primary(primary) => {
                tag::PRIMARY.hash(state);
                primary.hash(state);
            },
            Self::Add(terms) => {
                tag::ADD.hash(state);
                hash_unordered(terms.iter(), state);
            },
            Self::Mul(factors) => {
                tag::MUL.hash(state);
                hash_unordered(factors.iter(), state);
            },
            Self::RationalProduct(components) => {
                tag::MUL.hash(state);
                hash_unordered(components.iter(), state);
            },
            Self::Exp(base, exp) => {
                tag::EXP.hash(state);
                base.hash(state);
                exp.hash(state);
            },
            Self::RationalPow(pow) => pow.hash(state),
            Self::Vector(rows) => {
                tag::VECTOR.hash(state);
                rows.hash(state);
            },
            Self::Gcd(a, b) | Self::Lcm(a, b) | Self::DotProduct(a, b) => {
                let tag = match self {
                    Self::Gcd(..) => tag::GCD,
                    Self::Lcm(..) => tag::LCM,
                    _ => tag::DOT_PRODUCT,
                };
                tag.hash(state);
                a.hash(state);
                b.hash(state);
            },
            Self::Algorithm(algorithm) => {
                tag::ALGORITHM.hash(state);
                algorithm.hash(state);
            },
            Self::Function(name, args) => {
                tag::FUNCTION.hash(state);
                name.hash(state);
                args.hash(state);
            },
            Self::Compare(lhs, relation, rhs) => {
                tag::COMPARE.hash(state);
                lhs.hash(state);
                relation.hash(state);
                rhs.hash(state);
            },
        }
    }
}

impl Expr {
    /// Creates a new generated variable, distinct from every other generated variable.
    pub fn generated() -> Self {
        Self::Primary(Primary::Generated(VarId::fresh()))
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_)))
    }

    /// Returns true if the expression is a number, that is, a [`Primary::Integer`] or a
    /// [`Primary::Rational`].
    pub fn is_rational(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_) | Primary::Rational(_)))
    }

    /// If the expression is a number, returns it as a [`Fraction`].
    pub fn as_fraction(&self) -> Option<Fraction> {
        match self {
            Self::Primary(primary) => primary.as_fraction(),
            _ => None,
        }
    }

    /// Returns true if the expression is the number 0.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Primary(Primary::Integer(n)) => *n == 0,
            Self::Primary(Primary::Rational(f)) => f.is_zero(),
            _ => false,
        }
    }

    /// Returns true if the expression is the number 1.
    pub fn is_one(&self) -> bool {
        match self {
            Self::Primary(Primary::Integer(n)) => *n == 1,
            Self::Primary(Primary::Rational(f)) => f.is_one(),
            _ => false,
        }
    }

    /// Returns true if the expression denotes a single real number.
    pub fn is_real(&self) -> bool {
        matches!(
            self,
            Self::Primary(Primary::Integer(_) | Primary::Rational(_) | Primary::Constant(_))
                | Self::RationalPow(_)
                | Self::RationalProduct(_)
        )
    }

    /// Returns the sign of the expression, if it is real-valued.
    pub fn sign(&self) -> Option<Sign> {
        match self {
            Self::Primary(primary) => primary.sign(),
            Self::RationalPow(pow) => pow.sign(),
            Self::RationalProduct(components) => components.iter()
                .try_fold(Sign::Positive, |acc, pow| Some(acc.multiply(pow.sign()?))),
            _ => None,
        }
    }

    /// Returns the absolute value of a real-valued expression. Other expressions are returned
    /// unchanged.
    pub fn abs_real(&self) -> Self {
        match self {
            Self::Primary(Primary::Integer(n)) => Self::from(n.clone().abs()),
            Self::Primary(Primary::Rational(f)) => Self::from(f.clone().abs()),
            Self::RationalPow(pow) => Self::RationalPow(Box::new(RationalPow::new(
                pow.base.abs_real(),
                pow.exponent.clone(),
            ))),
            Self::RationalProduct(components) => Self::RationalProduct(
                components.iter()
                    .map(|pow| RationalPow::new(pow.base.abs_real(), pow.exponent.clone()))
                    .collect()
            ),
            _ => self.clone(),
        }
    }

    /// Negates a real-valued expression.
    ///
    /// Numbers are negated directly. Other real-valued expressions are multiplied by `(-1)^1`,
    /// forming a [`Expr::RationalProduct`]. Returns [`None`] if the expression is not
    /// real-valued.
    pub fn negate_real(&self) -> Option<Self> {
        let minus_one = RationalPow::unit(Self::from(int(-1)));
        match self {
            Self::Primary(Primary::Integer(n)) => Some(Self::from(Integer::from(-n))),
            Self::Primary(Primary::Rational(f)) => Some(Self::from(-f.clone())),
            Self::Primary(Primary::Constant(_)) | Self::RationalPow(_) => {
                Some(Self::RationalProduct(vec![minus_one, RationalPow::unit(self.clone())]))
            },
            Self::RationalProduct(components) => {
                let mut components = components.clone();
                components.insert(0, minus_one);
                Some(Self::RationalProduct(components))
            },
            _ => None,
        }
    }

    /// Returns the reciprocal of a real-valued expression.
    ///
    /// Numbers are inverted directly, though the reciprocal of zero is left as `0^-1`. Other
    /// real-valued expressions have their exponents negated. Returns [`None`] if the expression
    /// is not real-valued.
    pub fn reciprocal_real(&self) -> Option<Self> {
        match self {
            Self::Primary(Primary::Integer(_) | Primary::Rational(_)) if self.is_zero() => {
                Some(Self::RationalPow(Box::new(RationalPow::new(self.clone(), Fraction::from(-1)))))
            },
            Self::Primary(Primary::Integer(n)) => {
                Some(Fraction::from_integer(n.clone()).recip().into_expr())
            },
            Self::Primary(Primary::Rational(f)) => Some(f.clone().recip().into_expr()),
            Self::Primary(Primary::Constant(_)) => {
                Some(Self::RationalProduct(vec![RationalPow::new(self.clone(), Fraction::from(-1))]))
            },
            Self::RationalPow(pow) => Some(Self::RationalPow(Box::new(pow.reciprocal()))),
            Self::RationalProduct(components) => Some(Self::RationalProduct(
                components.iter().map(RationalPow::reciprocal).collect()
            )),
            _ => None,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// An [`Expr::Add`] with zero / one term, or an [`Expr::Mul`] with zero / one factor, is
    /// replaced by the single term / factor, or by the integer 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::from(int(0))
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::from(int(1))
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns true if the given expression appears anywhere in this expression, including this
    /// expression itself.
    pub fn contains(&self, needle: &Expr) -> bool {
        self.post_order_iter().any(|expr| expr == needle)
    }

    /// Returns true if both expressions have exactly the same representation: the same kinds of
    /// nodes, with children in the same order.
    ///
    /// This is stricter than `==`, which considers `x^2` stored as an [`Expr::Exp`] and as an
    /// [`Expr::RationalPow`] to be equal.
    pub fn is_identical(&self, other: &Self) -> bool {
        fn lists(lhs: &[Expr], rhs: &[Expr]) -> bool {
            lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| l.is_identical(r))
        }

        fn powers(lhs: &RationalPow, rhs: &RationalPow) -> bool {
            lhs.exponent == rhs.exponent && lhs.base.is_identical(&rhs.base)
        }

        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => {
                std::mem::discriminant(lhs) == std::mem::discriminant(rhs) && lhs == rhs
            },
            (Self::Add(lhs), Self::Add(rhs))
                | (Self::Mul(lhs), Self::Mul(rhs))
                | (Self::Vector(lhs), Self::Vector(rhs)) => lists(lhs, rhs),
            (Self::Exp(lhs_a, lhs_b), Self::Exp(rhs_a, rhs_b))
                | (Self::Gcd(lhs_a, lhs_b), Self::Gcd(rhs_a, rhs_b))
                | (Self::Lcm(lhs_a, lhs_b), Self::Lcm(rhs_a, rhs_b))
                | (Self::DotProduct(lhs_a, lhs_b), Self::DotProduct(rhs_a, rhs_b)) => {
                lhs_a.is_identical(rhs_a) && lhs_b.is_identical(rhs_b)
            },
            (Self::RationalPow(lhs), Self::RationalPow(rhs)) => powers(lhs, rhs),
            (Self::RationalProduct(lhs), Self::RationalProduct(rhs)) => {
                lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| powers(l, r))
            },
            (Self::Algorithm(lhs), Self::Algorithm(rhs)) => lhs == rhs,
            (Self::Function(lhs_name, lhs_args), Self::Function(rhs_name, rhs_args)) => {
                lhs_name == rhs_name && lists(lhs_args, rhs_args)
            },
            (Self::Compare(lhs_a, lhs_rel, lhs_b), Self::Compare(rhs_a, rhs_rel, rhs_b)) => {
                lhs_rel == rhs_rel && lhs_a.is_identical(rhs_a) && lhs_b.is_identical(rhs_b)
            },
            _ => false,
        }
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        Self::Primary(primary)
    }
}

impl From<Integer> for Expr {
    fn from(n: Integer) -> Self {
        Self::Primary(Primary::Integer(n))
    }
}

/// Converts to a [`Primary::Integer`] if the denominator is 1.
impl From<Fraction> for Expr {
    fn from(f: Fraction) -> Self {
        f.into_expr()
    }
}

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Self::Primary(Primary::Constant(c))
    }
}

impl From<RationalPow> for Expr {
    fn from(pow: RationalPow) -> Self {
        Self::RationalPow(Box::new(pow))
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except that the terms of operands
/// that are already [`Expr::Add`]s are combined into one list of terms (flattening).
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Subtracts `rhs` from `self`, as `self + -rhs`.
impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except that the factors of
/// operands that are already [`Expr::Mul`]s are combined into one list of factors (flattening).
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a number, in which case the number is negated.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Integer(n)) => Self::from(-n),
            Self::Primary(Primary::Rational(f)) => Self::from(-f),
            expr => Self::from(int(-1)) * expr,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn hash_of(expr: &Expr) -> u64 {
        let mut hasher = DefaultHasher::new();
        expr.hash(&mut hasher);
        hasher.finish()
    }

    fn sym(name: &str) -> Expr {
        Expr::Primary(Primary::Symbol(name.to_string()))
    }

    fn frac(numer: i32, denom: i32) -> Fraction {
        Fraction::new(int(numer), int(denom))
    }

    #[test]
    fn strict_equality_ignores_order() {
        let a = Expr::Add(vec![sym("x"), sym("y"), Expr::from(int(2))]);
        let b = Expr::Add(vec![Expr::from(int(2)), sym("x"), sym("y")]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn strict_equality_counts_duplicates() {
        let a = Expr::Mul(vec![sym("x"), sym("x"), sym("y")]);
        let b = Expr::Mul(vec![sym("x"), sym("y"), sym("y")]);
        assert_ne!(a, b);
    }

    #[test]
    fn strict_inequality_between_kinds() {
        let sum = Expr::Add(vec![sym("x"), sym("y")]);
        let product = Expr::Mul(vec![sym("x"), sym("y")]);
        assert_ne!(sum, product);
    }

    #[test]
    fn vector_order_matters() {
        let a = Expr::Vector(vec![Expr::from(int(1)), Expr::from(int(2))]);
        let b = Expr::Vector(vec![Expr::from(int(2)), Expr::from(int(1))]);
        assert_ne!(a, b);
    }

    #[test]
    fn rational_equals_integer() {
        let integer = Expr::from(int(2));
        let rational = Expr::Primary(Primary::Rational(frac(4, 2)));
        assert_eq!(integer, rational);
        assert_eq!(hash_of(&integer), hash_of(&rational));
    }

    #[test]
    fn rational_pow_equals_exp() {
        let pi = Expr::from(Constant::Pi);
        let pow = Expr::from(RationalPow::new(pi.clone(), Fraction::from(-1)));
        let exp = Expr::Exp(Box::new(pi), Box::new(Expr::from(int(-1))));
        assert_eq!(pow, exp);
        assert_eq!(exp, pow);
        assert_eq!(hash_of(&pow), hash_of(&exp));
    }

    #[test]
    fn rational_product_equals_mul() {
        let components = vec![
            RationalPow::new(Expr::from(int(5)), frac(1, 12)),
            RationalPow::new(Expr::from(int(3)), frac(1, 2)),
        ];
        let product = Expr::RationalProduct(components.clone());
        let mul = Expr::Mul(components.into_iter().rev().map(Expr::from).collect());
        assert_eq!(product, mul);
        assert_eq!(hash_of(&product), hash_of(&mul));
    }

    #[test]
    fn generated_variables_are_distinct() {
        let a = Expr::generated();
        let b = Expr::generated();
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn signs() {
        assert_eq!(Expr::from(int(-3)).sign(), Some(Sign::Negative));
        assert_eq!(Expr::from(int(0)).sign(), Some(Sign::Zero));
        assert_eq!(Expr::from(Constant::E).sign(), Some(Sign::Positive));
        assert_eq!(sym("x").sign(), None);

        let cube = RationalPow::new(Expr::from(int(-2)), Fraction::from(3));
        assert_eq!(cube.sign(), Some(Sign::Negative));
        let square = RationalPow::new(Expr::from(int(-2)), Fraction::from(2));
        assert_eq!(square.sign(), Some(Sign::Positive));
        let root = RationalPow::new(Expr::from(int(-2)), frac(1, 3));
        assert_eq!(root.sign(), Some(Sign::Positive));

        let product = Expr::RationalProduct(vec![cube, RationalPow::unit(Expr::from(Constant::Pi))]);
        assert_eq!(product.sign(), Some(Sign::Negative));
    }

    #[test]
    fn sign_arithmetic() {
        assert_eq!(Sign::Negative.multiply(Sign::Negative), Sign::Positive);
        assert_eq!(Sign::Negative.multiply(Sign::Positive), Sign::Negative);
        assert_eq!(Sign::Zero.multiply(Sign::Negative), Sign::Zero);
        assert_eq!(Sign::Positive.inverse(), Sign::Negative);
        assert_eq!(Sign::Zero.inverse(), Sign::Zero);
    }

    #[test]
    fn negate_and_reciprocal_real() {
        assert_eq!(Expr::from(int(3)).negate_real(), Some(Expr::from(int(-3))));
        assert_eq!(
            Expr::from(int(3)).reciprocal_real(),
            Some(Expr::Primary(Primary::Rational(frac(1, 3)))),
        );
        assert_eq!(
            Expr::Primary(Primary::Rational(frac(1, 3))).reciprocal_real(),
            Some(Expr::from(int(3))),
        );

        let pi = Expr::from(Constant::Pi);
        assert_eq!(
            pi.negate_real(),
            Some(Expr::RationalProduct(vec![
                RationalPow::unit(Expr::from(int(-1))),
                RationalPow::unit(pi.clone()),
            ])),
        );
        assert_eq!(
            pi.reciprocal_real(),
            Some(Expr::RationalProduct(vec![RationalPow::new(pi.clone(), Fraction::from(-1))])),
        );
        assert_eq!(sym("x").negate_real(), None);
    }

    #[test]
    fn operators_flatten() {
        let expr = (sym("x") + sym("y")) + (sym("z") + Expr::from(int(1)));
        assert_eq!(expr, Expr::Add(vec![sym("x"), sym("y"), sym("z"), Expr::from(int(1))]));

        let expr = sym("x") * (sym("y") * sym("z"));
        assert_eq!(expr, Expr::Mul(vec![sym("x"), sym("y"), sym("z")]));

        assert_eq!(-Expr::from(int(4)), Expr::from(int(-4)));
        assert_eq!(-sym("x"), Expr::Mul(vec![Expr::from(int(-1)), sym("x")]));
    }

    #[test]
    fn contains() {
        let expr = Expr::Add(vec![
            Expr::Exp(Box::new(sym("x")), Box::new(Expr::from(int(2)))),
            Expr::from(int(1)),
        ]);
        assert!(expr.contains(&sym("x")));
        assert!(!expr.contains(&sym("y")));
        assert!(expr.contains(&expr));
    }

    #[test]
    fn identical_is_stricter_than_equal() {
        let exp = Expr::Exp(Box::new(sym("x")), Box::new(Expr::from(int(2))));
        let pow = Expr::from(RationalPow::new(sym("x"), frac(2, 1)));
        assert_eq!(exp, pow);
        assert!(!exp.is_identical(&pow));
        assert!(exp.is_identical(&exp.clone()));

        let a = Expr::Mul(vec![sym("x"), sym("y")]);
        let b = Expr::Mul(vec![sym("y"), sym("x")]);
        assert_eq!(a, b);
        assert!(!a.is_identical(&b));

        let two = Expr::from(int(2));
        let rational_two = Expr::Primary(Primary::Rational(frac(2, 1)));
        assert_eq!(two, rational_two);
        assert!(!two.is_identical(&rational_two));
    }

    #[test]
    fn functions_compare_by_name_and_arguments() {
        let f = Expr::Function("f".to_string(), vec![sym("x"), sym("y")]);
        let g = Expr::Function("g".to_string(), vec![sym("x"), sym("y")]);
        let swapped = Expr::Function("f".to_string(), vec![sym("y"), sym("x")]);
        assert_ne!(f, g);
        assert_ne!(f, swapped);
        assert_eq!(f, f.clone());
        assert_eq!(hash_of(&f), hash_of(&f.clone()));
    }

    #[test]
    fn comparisons_keep_their_relation() {
        let compare = |relation, rhs| Expr::Compare(Box::new(sym("x")), relation, Box::new(rhs));
        let less = compare(Relation::Less, Expr::from(int(2)));
        let less_rational = compare(Relation::Less, Expr::Primary(Primary::Rational(frac(4, 2))));
        let greater = compare(Relation::Greater, Expr::from(int(2)));
        assert_eq!(less, less_rational);
        assert_eq!(hash_of(&less), hash_of(&less_rational));
        assert!(!less.is_identical(&less_rational));
        assert_ne!(less, greater);
        assert_eq!(Relation::GreaterOrEqual.symbol(), ">=");
    }
}
