//! Expansion of products of sums and integer powers of sums, used by the distributive strategy.

use crate::symbolic::expr::Expr;
use crate::symbolic::simplify::Engine;
use tracing::debug;
use super::multiply::Multiplier;

/// Returns every way to pick one element from each of the given sets, in lexicographic order.
///
/// `[[a, b], [c, d]]` -> `[[a, c], [a, d], [b, c], [b, d]]`
///
/// If any set is empty, there are no combinations. If there are no sets, there is exactly one,
/// empty, combination.
pub fn combinations<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut result = vec![Vec::with_capacity(sets.len())];
    for set in sets {
        result = result.into_iter()
            .flat_map(|prefix| set.iter().map(move |item| {
                let mut combination = prefix.clone();
                combination.push(item.clone());
                combination
            }))
            .collect();
    }
    result
}

/// `(a+b)*(c+d)*e = a*c*e + a*d*e + b*c*e + b*d*e`
///
/// `rest` is the already simplified product of every factor that is not a sum. If the expansion
/// would have more terms than [`Limits::max_expanded_terms`], the product is left unexpanded.
///
/// [`Limits::max_expanded_terms`]: crate::symbolic::simplify::Limits::max_expanded_terms
pub(crate) fn expand_product(engine: &Engine, additions: Vec<Vec<Expr>>, rest: Expr) -> Expr {
    let max_terms = engine.limits().max_expanded_terms;
    let count = additions.iter()
        .try_fold(1usize, |count, terms| count.checked_mul(terms.len()));
    if count.map_or(true, |count| count > max_terms) {
        debug!(?count, max_terms, "product of sums is too large to expand");
        let mut factors = match rest {
            rest if rest.is_one() => Vec::new(),
            Expr::Mul(factors) => factors,
            rest => vec![rest],
        };
        factors.extend(additions.into_iter().map(Expr::Add));
        return Expr::Mul(factors).downgrade();
    }

    let mut sets = additions;
    sets.push(vec![rest]);
    let terms = combinations(&sets)
        .into_iter()
        .map(|factors| engine.simplify_multiplication(factors));
    engine.simplify_addition(terms)
}

/// `(a+b)^2 = a^2 + 2*a*b + b^2`
///
/// Expands a positive integer power of an expression that is not real-valued by multiplying the
/// base by itself. Returns [`None`] if the exponent is not an integer greater than 1, or if the
/// exponent or the number of terms of the expanded sum is larger than
/// [`Limits::max_expanded_terms`].
///
/// [`Limits::max_expanded_terms`]: crate::symbolic::simplify::Limits::max_expanded_terms
pub(crate) fn expand_power(engine: &Engine, base: &Expr, exp: &Expr) -> Option<Expr> {
    if base.is_real() {
        return None;
    }

    let max_terms = engine.limits().max_expanded_terms;
    let n = exp.as_integer()?.to_usize()?;
    if n < 2 || n > max_terms {
        return None;
    }

    if let Expr::Add(terms) = base {
        let count = u32::try_from(n).ok()
            .and_then(|n| terms.len().checked_pow(n));
        if count.map_or(true, |count| count > max_terms) {
            debug!(?count, max_terms, "power of a sum is too large to expand");
            return None;
        }
    }

    let mut multiplier = Multiplier::new(engine);
    for _ in 0..n {
        multiplier.push(base.clone());
    }
    Some(multiplier.finish())
}

#[cfg(test)]
mod tests {
    use crate::symbolic::expr::build::*;
    use crate::symbolic::simplify::Limits;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn combinations_in_order() {
        let sets = vec![vec![1, 2], vec![3, 4], vec![5]];
        assert_eq!(
            combinations(&sets),
            vec![vec![1, 3, 5], vec![1, 4, 5], vec![2, 3, 5], vec![2, 4, 5]],
        );
    }

    #[test]
    fn combinations_edge_cases() {
        assert_eq!(combinations::<i32>(&[]), vec![Vec::<i32>::new()]);
        assert_eq!(combinations(&[vec![1, 2], vec![]]), Vec::<Vec<i32>>::new());
    }

    #[test]
    fn product_of_sums() {
        let engine = Engine::distributive();
        let [a, b, c, d, e] = ["a", "b", "c", "d", "e"].map(symbol);
        let result = engine.simplify_multiplication([
            add(a.clone(), b.clone()),
            add(c.clone(), d.clone()),
            e.clone(),
        ]);
        assert_eq!(result, Expr::Add(vec![
            Expr::Mul(vec![a.clone(), c.clone(), e.clone()]),
            Expr::Mul(vec![a, d.clone(), e.clone()]),
            Expr::Mul(vec![b.clone(), c, e.clone()]),
            Expr::Mul(vec![b, d, e]),
        ]));
    }

    #[test]
    fn square_of_sum() {
        let engine = Engine::distributive();
        let a = symbol("a");
        let result = expand_power(&engine, &add(a.clone(), integer(1)), &integer(2));
        assert_eq!(result, Some(Expr::Add(vec![
            pow(a.clone(), integer(2)),
            Expr::Mul(vec![integer(2), a]),
            integer(1),
        ])));
    }

    #[test]
    fn real_bases_are_not_expanded() {
        let engine = Engine::distributive();
        assert_eq!(expand_power(&engine, &integer(3), &integer(2)), None);
        assert_eq!(expand_power(&engine, &symbol("x"), &integer(1)), None);
        assert_eq!(expand_power(&engine, &symbol("x"), &rational(1, 2)), None);
    }

    #[test]
    fn large_expansions_are_left_alone() {
        let engine = Engine::distributive()
            .with_limits(Limits::DEFAULT.with_max_expanded_terms(3));
        let [a, b, c, d] = ["a", "b", "c", "d"].map(symbol);
        let result = engine.simplify_multiplication([
            add(a.clone(), b.clone()),
            add(c.clone(), d.clone()),
        ]);
        assert_eq!(result, Expr::Mul(vec![add(a, b), add(c, d)]));
    }

    #[test]
    fn large_powers_of_sums_are_left_alone() {
        let engine = Engine::distributive();
        let [a, b, c] = ["a", "b", "c"].map(symbol);
        let sum = Expr::Add(vec![a, b, c]);

        // 3^8 = 6561 terms
        assert_eq!(expand_power(&engine, &sum, &integer(8)), None);
        assert!(expand_power(&engine, &sum, &integer(2)).is_some());

        let expr = pow(sum.clone(), integer(8));
        assert_eq!(engine.simplify(&expr), expr);
        assert_eq!(crate::symbolic::expand(&expr), expr);
    }
}
