//! Bottom-up rewriting of expression trees.
//!
//! [`Expr::visit`] walks the tree in post-order: every child is rewritten before its parent. A
//! parent is only rebuilt if one of its children actually changed; otherwise the [`Visitor`]
//! receives the unchanged node as a [`Cow::Borrowed`], which makes no-op rewrites free.

use std::borrow::Cow;
use super::{Algorithm, Expr, RationalPow};

/// Whether [`Expr::visit`] should descend into the children of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrance {
    /// Visit the children first, then call [`Visitor::post_enter`].
    Visit,

    /// Do not visit the children; pass the expression straight to [`Visitor::visit_single`].
    Skip,
}

/// Callbacks used by [`Expr::visit`] to rewrite an expression tree.
pub trait Visitor {
    /// Called before descending into an expression that has children.
    fn pre_enter(&mut self, _expr: &Expr) -> Entrance {
        Entrance::Visit
    }

    /// Rewrites an expression without children, or one whose children were skipped.
    fn visit_single<'a>(&mut self, expr: Cow<'a, Expr>) -> Cow<'a, Expr>;

    /// Rewrites an expression after its children have been visited.
    ///
    /// The expression is [`Cow::Owned`] if it was rebuilt because a child changed.
    fn post_enter<'a>(&mut self, expr: Cow<'a, Expr>) -> Cow<'a, Expr> {
        self.visit_single(expr)
    }
}

/// Visits a single child, returning [`None`] if it was unchanged.
fn visit_child<V: Visitor + ?Sized>(expr: &Expr, visitor: &mut V) -> Option<Expr> {
    match expr.visit(visitor) {
        Cow::Borrowed(_) => None,
        Cow::Owned(expr) => Some(expr),
    }
}

/// Visits every expression in the list, returning [`None`] if none of them changed.
fn visit_list<V: Visitor + ?Sized>(items: &[Expr], visitor: &mut V) -> Option<Vec<Expr>> {
    let visited = items.iter()
        .map(|item| item.visit(visitor))
        .collect::<Vec<_>>();
    if visited.iter().all(|item| matches!(item, Cow::Borrowed(_))) {
        None
    } else {
        Some(visited.into_iter().map(Cow::into_owned).collect())
    }
}

/// Visits both operands of a binary node, returning [`None`] if neither changed.
fn visit_pair<V: Visitor + ?Sized>(
    lhs: &Expr,
    rhs: &Expr,
    visitor: &mut V,
) -> Option<(Box<Expr>, Box<Expr>)> {
    let new_lhs = visit_child(lhs, visitor);
    let new_rhs = visit_child(rhs, visitor);
    if new_lhs.is_none() && new_rhs.is_none() {
        return None;
    }
    Some((
        Box::new(new_lhs.unwrap_or_else(|| lhs.clone())),
        Box::new(new_rhs.unwrap_or_else(|| rhs.clone())),
    ))
}

/// Visits the base of every power, returning [`None`] if none of them changed.
fn visit_powers<V: Visitor + ?Sized>(
    components: &[RationalPow],
    visitor: &mut V,
) -> Option<Vec<RationalPow>> {
    let bases = components.iter()
        .map(|pow| visit_child(&pow.base, visitor))
        .collect::<Vec<_>>();
    if bases.iter().all(Option::is_none) {
        return None;
    }
    Some(
        components.iter()
            .zip(bases)
            .map(|(pow, base)| match base {
                Some(base) => RationalPow::new(base, pow.exponent.clone()),
                None => pow.clone(),
            })
            .collect()
    )
}

impl Expr {
    /// Rewrites this expression bottom-up with the given [`Visitor`].
    ///
    /// Returns [`Cow::Borrowed`] if neither this expression nor any of its children were
    /// changed by the visitor.
    pub fn visit<'a, V: Visitor + ?Sized>(&'a self, visitor: &mut V) -> Cow<'a, Expr> {
        if let Self::Primary(_) = self {
            return visitor.visit_single(Cow::Borrowed(self));
        }

        if visitor.pre_enter(self) == Entrance::Skip {
            return visitor.visit_single(Cow::Borrowed(self));
        }

        let rebuilt = match self {
            Self::Primary(_) => None,
            Self::Add(terms) => visit_list(terms, visitor).map(Self::Add),
            Self::Mul(factors) => visit_list(factors, visitor).map(Self::Mul),
            Self::Vector(rows) => visit_list(rows, visitor).map(Self::Vector),
            Self::Exp(base, exp) => visit_pair(base, exp, visitor)
                .map(|(base, exp)| Self::Exp(base, exp)),
            Self::Gcd(a, b) => visit_pair(a, b, visitor).map(|(a, b)| Self::Gcd(a, b)),
            Self::Lcm(a, b) => visit_pair(a, b, visitor).map(|(a, b)| Self::Lcm(a, b)),
            Self::DotProduct(a, b) => visit_pair(a, b, visitor)
                .map(|(a, b)| Self::DotProduct(a, b)),
            Self::RationalPow(pow) => visit_child(&pow.base, visitor)
                .map(|base| Self::from(RationalPow::new(base, pow.exponent.clone()))),
            Self::RationalProduct(components) => visit_powers(components, visitor)
                .map(Self::RationalProduct),
            Self::Algorithm(algorithm) => match &**algorithm {
                Algorithm::Eval(inner) => visit_child(inner, visitor)
                    .map(|inner| Self::Algorithm(Box::new(Algorithm::Eval(inner)))),
                Algorithm::Expand(inner) => visit_child(inner, visitor)
                    .map(|inner| Self::Algorithm(Box::new(Algorithm::Expand(inner)))),
                Algorithm::Diff { expr, variable, grade } => visit_child(expr, visitor)
                    .map(|expr| Self::Algorithm(Box::new(Algorithm::Diff {
                        expr,
                        variable: variable.clone(),
                        grade: *grade,
                    }))),
            },
            Self::Function(name, args) => visit_list(args, visitor)
                .map(|args| Self::Function(name.clone(), args)),
            Self::Compare(lhs, relation, rhs) => visit_pair(lhs, rhs, visitor)
                .map(|(lhs, rhs)| Self::Compare(lhs, *relation, rhs)),
        };

        match rebuilt {
            Some(expr) => visitor.post_enter(Cow::Owned(expr)),
            None => visitor.post_enter(Cow::Borrowed(self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::expr::build::*;
    use crate::symbolic::expr::{Primary, Relation};
    use pretty_assertions::assert_eq;
    use super::*;

    /// Renames every symbol `x` to `y`.
    struct Rename;

    impl Visitor for Rename {
        fn visit_single<'a>(&mut self, expr: Cow<'a, Expr>) -> Cow<'a, Expr> {
            match &*expr {
                Expr::Primary(Primary::Symbol(name)) if name == "x" => Cow::Owned(symbol("y")),
                _ => expr,
            }
        }
    }

    /// Counts how many composite nodes were rebuilt, and never descends into vectors.
    #[derive(Default)]
    struct CountRebuilt {
        rebuilt: usize,
    }

    impl Visitor for CountRebuilt {
        fn pre_enter(&mut self, expr: &Expr) -> Entrance {
            if let Expr::Vector(_) = expr {
                Entrance::Skip
            } else {
                Entrance::Visit
            }
        }

        fn visit_single<'a>(&mut self, expr: Cow<'a, Expr>) -> Cow<'a, Expr> {
            Rename.visit_single(expr)
        }

        fn post_enter<'a>(&mut self, expr: Cow<'a, Expr>) -> Cow<'a, Expr> {
            if let Cow::Owned(_) = expr {
                self.rebuilt += 1;
            }
            expr
        }
    }

    #[test]
    fn unchanged_tree_is_borrowed() {
        let expr = add(symbol("a"), multiply(symbol("b"), integer(2)));
        assert!(matches!(expr.visit(&mut Rename), Cow::Borrowed(_)));
    }

    #[test]
    fn changed_leaf_rebuilds_ancestors() {
        let expr = add(symbol("a"), multiply(symbol("x"), integer(2)));
        let result = expr.visit(&mut Rename);
        assert_eq!(result.into_owned(), add(symbol("a"), multiply(symbol("y"), integer(2))));
    }

    #[test]
    fn only_changed_paths_are_rebuilt() {
        let expr = add(
            multiply(symbol("a"), symbol("b")),
            pow(symbol("x"), integer(2)),
        );
        let mut visitor = CountRebuilt::default();
        let result = expr.visit(&mut visitor);
        assert_eq!(result.into_owned(), add(
            multiply(symbol("a"), symbol("b")),
            pow(symbol("y"), integer(2)),
        ));
        // the power and the sum, but not the product
        assert_eq!(visitor.rebuilt, 2);
    }

    #[test]
    fn functions_and_comparisons_are_descended_into() {
        let expr = compare(
            function("f", vec![symbol("x"), symbol("a")]),
            Relation::LessOrEqual,
            symbol("x"),
        );
        assert_eq!(
            expr.visit(&mut Rename).into_owned(),
            compare(
                function("f", vec![symbol("y"), symbol("a")]),
                Relation::LessOrEqual,
                symbol("y"),
            ),
        );
    }

    #[test]
    fn skipped_children_are_not_visited() {
        let expr = vector(vec![symbol("x")]);
        let mut visitor = CountRebuilt::default();
        assert_eq!(expr.visit(&mut visitor).into_owned(), vector(vec![symbol("x")]));
        assert_eq!(visitor.rebuilt, 0);
    }
}
