//! Reduction of expressions to a canonical form.
//!
//! The [`Engine`] rewrites an expression bottom-up with a single [`Expr::visit`] pass: every
//! child is simplified before its parent, then a node rule is applied to the parent. The rules
//! live in [`rules`], and are built around two accumulators:
//!
//! - the adder, which adds numbers exactly, adds vectors row by row, and combines like terms
//! (`2x + 3x = 5x`);
//! - the multiplier, which collects every real-valued factor into a single product of powers
//! with rational exponents, and groups other factors by base (`x * x = x^2`).
//!
//! Products of powers are normalized by the fixpoint procedure in [`rules::power`], which reduces
//! `12^(1/2)` to `2 * 3^(1/2)` and `4^(-1/2)` to `1/2`.
//!
//! There are two strategies. [`Strategy::Evaluate`], the default, keeps sums inside products
//! intact. [`Strategy::Distribute`] expands products of sums and positive integer powers of sums,
//! so that `(a+1)^2` becomes `a^2 + 2a + 1`.
//!
//! ```
//! use cas_algebra::symbolic::expr::{build::*, Expr};
//! use cas_algebra::symbolic::simplify;
//!
//! let x = symbol("x");
//! let expr = add(add(x.clone(), integer(1)), add(x.clone(), integer(2)));
//!
//! // `x + 1 + x + 2 = 2x + 3`
//! assert_eq!(
//!     simplify(&expr),
//!     Expr::Add(vec![Expr::Mul(vec![integer(2), x]), integer(3)]),
//! );
//! ```
//!
//! Simplification never fails. Limits on the work done for large inputs are set with
//! [`Limits`]; when one is reached, the affected part of the expression is left as is.

pub mod fraction;
pub mod limits;
pub mod rules;
pub mod step;

use crate::integer::PrimeTable;
use crate::symbolic::expr::{Expr, Primary, RationalPow, Visitor};
use crate::symbolic::step_collector::StepCollector;
use rules::{add::Adder, multiply::Multiplier, power};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::trace;

pub use limits::Limits;
pub use rules::distribute::combinations;
pub use step::Step;

/// How the engine treats products that contain sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Sums inside products are kept as factors.
    #[default]
    Evaluate,

    /// Products of sums are expanded by the distributive property, and positive integer powers of
    /// expressions that are not real-valued are expanded by repeated multiplication.
    Distribute,
}

/// A configured simplification engine.
///
/// The engine holds no state between calls, so one engine may be used to simplify any number of
/// expressions, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    strategy: Strategy,
    limits: Limits,
    primes: Option<Arc<PrimeTable>>,
}

impl Engine {
    /// Creates an engine with the [`Strategy::Evaluate`] strategy.
    pub fn evaluating() -> Self {
        Self::default()
    }

    /// Creates an engine with the [`Strategy::Distribute`] strategy.
    pub fn distributive() -> Self {
        Self {
            strategy: Strategy::Distribute,
            ..Self::default()
        }
    }

    /// Uses the given limits instead of [`Limits::DEFAULT`].
    pub fn with_limits(self, limits: Limits) -> Self {
        Self { limits, ..self }
    }

    /// Factorizes integers with the given prime table instead of [`PrimeTable::global`].
    pub fn with_prime_table(self, primes: Arc<PrimeTable>) -> Self {
        Self { primes: Some(primes), ..self }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the prime table used to factorize integers.
    pub fn primes(&self) -> &PrimeTable {
        match &self.primes {
            Some(primes) => primes.as_ref(),
            None => PrimeTable::global(),
        }
    }

    /// Simplifies the given expression.
    pub fn simplify(&self, expr: &Expr) -> Expr {
        self.simplify_with(expr, &mut ())
    }

    /// Simplifies the given expression, recording a [`Step`] for every node that was rewritten.
    pub fn simplify_with(&self, expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Expr {
        let mut simplifier = Simplifier {
            engine: self,
            step_collector,
        };
        expr.visit(&mut simplifier).into_owned()
    }

    /// Adds simplified terms together.
    pub(crate) fn simplify_addition(&self, terms: impl IntoIterator<Item = Expr>) -> Expr {
        let mut adder = Adder::new(self);
        for term in terms {
            adder.push(term);
        }
        adder.finish()
    }

    /// Multiplies simplified factors together.
    pub(crate) fn simplify_multiplication(&self, factors: impl IntoIterator<Item = Expr>) -> Expr {
        let mut multiplier = Multiplier::new(self);
        for factor in factors {
            multiplier.push(factor);
        }
        multiplier.finish()
    }

    /// Multiplies real-valued powers together.
    pub(crate) fn rational_product(&self, components: Vec<RationalPow>) -> Expr {
        power::rational_product(self, components)
    }

    /// Normalizes a [`Expr::RationalPow`] or [`Expr::RationalProduct`]. Other expressions are
    /// returned unchanged.
    pub(crate) fn renormalize(&self, expr: Expr) -> Expr {
        match expr {
            Expr::RationalPow(pow) => self.rational_product(vec![*pow]),
            Expr::RationalProduct(components) => self.rational_product(components),
            expr => expr,
        }
    }
}

/// The [`Visitor`] that applies the node rules of an [`Engine`].
struct Simplifier<'e, 's> {
    engine: &'e Engine,
    step_collector: &'s mut dyn StepCollector<Step>,
}

impl Visitor for Simplifier<'_, '_> {
    fn visit_single<'a>(&mut self, expr: Cow<'a, Expr>) -> Cow<'a, Expr> {
        match rules::all(self.engine, &expr) {
            Some((result, step)) if !result.is_identical(&expr) => {
                trace!("{} -> {}", expr, result);
                self.step_collector.push(step);
                Cow::Owned(result)
            },
            _ => expr,
        }
    }
}

/// Simplifies the given expression with the [`Strategy::Evaluate`] strategy.
pub fn simplify(expr: &Expr) -> Expr {
    Engine::evaluating().simplify(expr)
}

/// Simplifies the given expression with the [`Strategy::Evaluate`] strategy, recording each step
/// in the given [`StepCollector`].
pub fn simplify_with(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Expr {
    Engine::evaluating().simplify_with(expr, step_collector)
}

/// Simplifies the given expression with the [`Strategy::Evaluate`] strategy, returning the steps
/// taken.
pub fn simplify_with_steps(expr: &Expr) -> (Expr, Vec<Step>) {
    let mut steps = Vec::new();
    let simplified = simplify_with(expr, &mut steps);
    (simplified, steps)
}

/// Simplifies the given expression with the [`Strategy::Distribute`] strategy.
pub fn expand(expr: &Expr) -> Expr {
    Engine::distributive().simplify(expr)
}

#[cfg(test)]
mod tests {
    use crate::primitive::int;
    use crate::symbolic::expr::{build::*, Constant, Relation};
    use super::fraction::Fraction;
    use pretty_assertions::assert_eq;
    use rug::{ops::Pow, Integer};
    use super::*;

    fn power(base: Expr, numer: i32, denom: i32) -> RationalPow {
        RationalPow::new(base, Fraction::new(int(numer), int(denom)))
    }

    #[test]
    fn rational_arithmetic() {
        assert_eq!(simplify(&subtract(integer(1), integer(2))), integer(-1));
        assert_eq!(simplify(&add(integer(5), rational(3, 4))), rational(23, 4));
        assert_eq!(simplify(&multiply(rational(1, 2), rational(4, 5))), rational(2, 5));
        assert_eq!(simplify(&divide(rational(1, 2), rational(4, 5))), rational(5, 8));
        assert_eq!(simplify(&divide(rational(1, 2), integer(5))), rational(1, 10));
        assert_eq!(simplify(&divide(integer(4), integer(2))), integer(2));
    }

    #[test]
    fn rational_powers() {
        assert_eq!(simplify(&pow(integer(27), rational(1, 3))), integer(3));
        assert_eq!(simplify(&pow(integer(4), rational(-1, 2))), rational(1, 2));
        assert_eq!(simplify(&pow(integer(-8), rational(1, 3))), integer(-2));
        assert_eq!(simplify(&pow(rational(2, 3), integer(-1))), rational(3, 2));
        assert_eq!(simplify(&pow(rational(2, 3), integer(2))), rational(4, 9));
        assert_eq!(
            simplify(&pow(integer(12), rational(1, 2))),
            Expr::RationalProduct(vec![power(integer(2), 1, 1), power(integer(3), 1, 2)]),
        );
    }

    #[test]
    fn roots_with_remainder() {
        // 3645 = 3^6 * 5
        assert_eq!(
            simplify(&pow(integer(3645), rational(1, 12))),
            Expr::RationalProduct(vec![power(integer(5), 1, 12), power(integer(3), 1, 2)]),
        );
    }

    #[test]
    fn products_of_roots() {
        let root = |n: i32| pow(integer(n), rational(1, 2));
        assert_eq!(simplify(&multiply(root(2), root(2))), integer(2));
        assert_eq!(simplify(&multiply(root(3), root(12))), integer(6));
        assert_eq!(simplify(&multiply(root(2), root(3))), Expr::from(power(integer(6), 1, 2)));
    }

    #[test]
    fn irrational_constants() {
        let expr = add(add(integer(1), pi()), add(e(), integer(2)));
        assert_eq!(simplify(&expr), Expr::Add(vec![pi(), e(), integer(3)]));

        assert_eq!(
            simplify(&divide(integer(5), pi())),
            Expr::RationalProduct(vec![power(integer(5), 1, 1), power(pi(), -1, 1)]),
        );
        assert_eq!(simplify(&divide(integer(1), pi())), Expr::from(power(pi(), -1, 1)));
        assert_eq!(simplify(&multiply(pi(), reciprocal(pi()))), integer(1));
    }

    #[test]
    fn like_irrational_terms() {
        let five_over_pi = divide(integer(5), pi());
        assert_eq!(
            simplify(&add(five_over_pi.clone(), five_over_pi)),
            Expr::RationalProduct(vec![power(integer(10), 1, 1), power(pi(), -1, 1)]),
        );

        let x = symbol("x");
        let root_three = pow(integer(3), rational(1, 2));
        let expr = add(
            multiply(multiply(integer(2), root_three.clone()), x.clone()),
            multiply(root_three, x.clone()),
        );
        assert_eq!(
            simplify(&expr),
            Expr::Mul(vec![Expr::from(power(integer(3), 3, 2)), x]),
        );
    }

    #[test]
    fn dot_products() {
        let expr = dot_product(
            vector(vec![integer(1), integer(2), integer(3)]),
            vector(vec![integer(4), integer(5), integer(6)]),
        );
        assert_eq!(simplify(&expr), integer(32));

        let x = symbol("x");
        let expr = dot_product(
            vector(vec![x.clone(), integer(1)]),
            vector(vec![x.clone(), integer(2)]),
        );
        assert_eq!(simplify(&expr), add(pow(x, integer(2)), integer(2)));
    }

    #[test]
    fn gcd_and_lcm() {
        assert_eq!(simplify(&gcd(integer(12), integer(18))), integer(6));
        assert_eq!(simplify(&lcm(integer(4), integer(6))), integer(12));
        assert_eq!(simplify(&gcd(add(integer(6), integer(6)), integer(8))), integer(4));

        // outside of the domain, left alone
        assert_eq!(simplify(&gcd(integer(-12), integer(18))), gcd(integer(-12), integer(18)));
        assert_eq!(simplify(&lcm(integer(4), integer(-6))), lcm(integer(4), integer(-6)));
    }

    #[test]
    fn vectors() {
        let x = symbol("x");
        let v = vector(vec![integer(1), x.clone()]);
        assert_eq!(
            simplify(&add(v.clone(), v.clone())),
            vector(vec![integer(2), multiply(integer(2), x.clone())]),
        );
        assert_eq!(
            simplify(&multiply(integer(3), v)),
            vector(vec![integer(3), multiply(integer(3), x)]),
        );
    }

    #[test]
    fn zero_absorbs_products() {
        let x = symbol("x");
        assert_eq!(simplify(&multiply(integer(0), x.clone())), integer(0));
        assert_eq!(simplify(&multiply(x.clone(), subtract(x.clone(), x))), integer(0));
    }

    #[test]
    fn like_factors() {
        let x = symbol("x");
        assert_eq!(simplify(&multiply(x.clone(), x.clone())), pow(x.clone(), integer(2)));
        assert_eq!(simplify(&divide(x.clone(), x.clone())), integer(1));
        assert_eq!(simplify(&pow(x.clone(), integer(0))), integer(1));
        assert_eq!(simplify(&pow(x.clone(), integer(1))), x);
    }

    #[test]
    fn generated_variables_flatten() {
        let v = Expr::generated();
        let w = Expr::generated();
        let expr = add(add(v.clone(), w.clone()), add(v.clone(), integer(1)));
        assert_eq!(
            simplify(&expr),
            Expr::Add(vec![multiply(integer(2), v), w, integer(1)]),
        );
    }

    #[test]
    fn functions_and_comparisons_pass_through() {
        let x = symbol("x");
        let expr = compare(
            function("f", vec![add(x.clone(), x.clone()), add(integer(1), integer(2))]),
            Relation::Less,
            multiply(integer(2), integer(3)),
        );
        assert_eq!(simplify(&expr), Expr::Compare(
            Box::new(function("f", vec![multiply(integer(2), x.clone()), integer(3)])),
            Relation::Less,
            Box::new(integer(6)),
        ));

        // nothing to rewrite
        let unchanged = equation(function("g", vec![x.clone()]), x);
        let mut steps = Vec::new();
        assert_eq!(Engine::evaluating().simplify_with(&unchanged, &mut steps), unchanged);
        assert!(steps.is_empty());
    }

    #[test]
    fn nested_products_merge() {
        let [a, b, c, d] = [(); 4].map(|_| Expr::generated());
        let expr = multiply(multiply(a.clone(), b.clone()), multiply(c.clone(), d.clone()));
        let simplified = simplify(&expr);
        assert_eq!(
            simplified,
            Expr::Mul(vec![a.clone(), b.clone(), c.clone(), d.clone()]),
        );
        assert_eq!(simplified, Expr::Mul(vec![d, b, a, c]));
    }

    #[test]
    fn distributes_products_of_sums() {
        let [a, b, c, d, e] = ["a", "b", "c", "d", "e"].map(symbol);
        let expr = multiply(
            multiply(add(a.clone(), b.clone()), add(c.clone(), d.clone())),
            e.clone(),
        );
        assert_eq!(expand(&expr), Expr::Add(vec![
            Expr::Mul(vec![a.clone(), c.clone(), e.clone()]),
            Expr::Mul(vec![a, d.clone(), e.clone()]),
            Expr::Mul(vec![b.clone(), c, e.clone()]),
            Expr::Mul(vec![b, d, e]),
        ]));
    }

    #[test]
    fn binomial_square() {
        let a = symbol("a");
        let expr = pow(add(a.clone(), integer(1)), integer(2));
        assert_eq!(expand(&expr), Expr::Add(vec![
            pow(a.clone(), integer(2)),
            multiply(integer(2), a.clone()),
            integer(1),
        ]));

        // left alone by the evaluating engine
        assert_eq!(simplify(&expr), expr);
    }

    #[test]
    fn idempotent() {
        let x = symbol("x");
        let y = symbol("y");
        let samples = [
            add(multiply(integer(2), x.clone()), multiply(integer(3), x.clone())),
            pow(integer(3645), rational(1, 12)),
            multiply(divide(integer(5), pi()), pow(integer(8), rational(1, 2))),
            add(pow(integer(2), rational(1, 2)), multiply(x.clone(), pow(integer(8), rational(1, 2)))),
            multiply(pow(x.clone(), rational(1, 2)), multiply(y.clone(), x.clone())),
            add(vector(vec![x.clone(), integer(1)]), vector(vec![y.clone(), rational(1, 3)])),
            pow(add(x.clone(), y.clone()), integer(3)),
            multiply(pow(integer(-4), rational(1, 2)), pow(integer(-2), rational(1, 3))),
            multiply(Expr::from(Constant::E), subtract(x.clone(), y.clone())),
        ];

        for engine in [Engine::evaluating(), Engine::distributive()] {
            for sample in &samples {
                let once = engine.simplify(sample);
                let twice = engine.simplify(&once);
                assert_eq!(once, twice, "simplifying {} twice", sample);
            }
        }
    }

    #[test]
    fn simplified_expressions_are_borrowed() {
        let engine = Engine::evaluating();
        let x = symbol("x");
        let expr = add(multiply(integer(2), x.clone()), pow(x, integer(2)));
        let mut steps = Vec::new();
        let simplified = engine.simplify_with(&expr, &mut steps);
        assert_eq!(simplified, expr);
        assert!(steps.is_empty());
    }

    #[test]
    fn large_powers_are_left_alone() {
        let engine = Engine::evaluating()
            .with_limits(Limits::DEFAULT.with_max_power_bits(32));
        let expr = pow(integer(7), rational(100, 3));
        assert_eq!(engine.simplify(&expr), Expr::from(power(integer(7), 100, 3)));

        // small enough to evaluate with the defaults
        assert_eq!(simplify(&pow(integer(2), rational(30, 2))), integer(32768));
    }

    #[test]
    fn exact_powers_within_budget() {
        let ten = Integer::from(10);
        assert_eq!(
            simplify(&pow(integer(10), integer(100))),
            Expr::from(Integer::from((&ten).pow(100u32))),
        );
        assert_eq!(
            simplify(&pow(integer(2), integer(300))),
            Expr::from(Integer::from(Integer::u_pow_u(2, 300))),
        );
        assert_eq!(
            simplify(&pow(integer(10), rational(400, 2))),
            Expr::from(Integer::from((&ten).pow(200u32))),
        );

        // 2 + 600 bits is over the default budget
        assert_eq!(
            simplify(&pow(integer(2), integer(600))),
            Expr::from(power(integer(2), 600, 1)),
        );
    }

    #[test]
    fn custom_prime_table() {
        let engine = Engine::evaluating()
            .with_prime_table(Arc::new(PrimeTable::new(10)));
        // 143 = 11 * 13, with neither prime in the table
        assert_eq!(
            engine.simplify(&pow(integer(4 * 143), rational(1, 2))),
            Expr::RationalProduct(vec![power(integer(2), 1, 1), power(integer(143), 1, 2)]),
        );
    }

    #[test]
    fn records_steps() {
        let x = symbol("x");
        let expr = add(add(x.clone(), x.clone()), pow(integer(27), rational(1, 3)));
        let (simplified, steps) = simplify_with_steps(&expr);
        assert_eq!(simplified, add(multiply(integer(2), x), integer(3)));
        // the outer sum is already in canonical form once its terms are simplified
        assert_eq!(steps, vec![Step::CombineLikeTerms, Step::RationalPower]);
    }

    #[test]
    fn records_distribution() {
        let a = symbol("a");
        let expr = multiply(integer(2), add(a.clone(), integer(1)));
        let mut steps = Vec::new();
        let expanded = Engine::distributive().simplify_with(&expr, &mut steps);
        assert_eq!(expanded, add(multiply(integer(2), a), integer(2)));
        assert_eq!(steps, vec![Step::DistributiveProperty]);
    }
}
