//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Algebraic expressions in this module are represented as a tree of [`Expr`] nodes, which
//! **flatten** out sums and products. For example, the expression `x + (y + z)` is represented as
//! a single [`Expr::Add`] node with _three_ children, `x`, `y`, and `z`.
//!
//! This is done to make it easier to perform algebraic manipulations on the expression. A common
//! step in simplifying an expression is to combine "like terms", that is, to combine terms that
//! share the same factors (e.g. `x + x = 2x`). This is much easier to do when the terms in
//! question are all at the same level in the tree.
//!
//! Expressions are usually built with the helpers in [`expr::build`], and the `+`, `*`, and `-`
//! operators, which flatten as they go:
//!
//! ```
//! use cas_algebra::symbolic::expr::{build::symbol, Expr};
//!
//! let expr = symbol("x") + (symbol("y") + symbol("z"));
//! assert_eq!(expr, Expr::Add(vec![symbol("x"), symbol("y"), symbol("z")]));
//! ```
//!
//! # Simplification
//!
//! A primary use case for algebraic manipulation is to reduce expressions to a canonical form.
//! This is done with the [`simplify()`] function, which accepts an expression and returns a
//! simplified, semantically equivalent version of it. Real numbers are kept exact: rationals stay
//! rationals, and roots are reduced as far as the prime factorization of their radicand allows.
//!
//! ```
//! use cas_algebra::symbolic::expr::build::*;
//! use cas_algebra::symbolic::simplify;
//!
//! // `(1/2)^(-1) + 27^(1/3) = 5`
//! let expr = add(pow(rational(1, 2), integer(-1)), pow(integer(27), rational(1, 3)));
//! assert_eq!(simplify(&expr), integer(5));
//! ```
//!
//! [`expand()`] works the same way, but also distributes products over sums. For more
//! information, see the [`mod@simplify`] module.

pub mod derivative;
pub mod expr;
pub mod simplify;
pub mod step_collector;

pub use derivative::derivative;
pub use expr::Expr;
pub use simplify::{expand, simplify, simplify_with, simplify_with_steps, Engine};
pub use step_collector::StepCollector;
