//! Expressions that carry a deferred computation.

use crate::symbolic::derivative::derivative;
use crate::symbolic::simplify::Engine;
use super::Expr;
use super::build::symbol;

/// A computation on an expression that is performed on demand by [`Algorithm::evaluate`].
///
/// The simplification engine treats these nodes as opaque: it simplifies the wrapped expression,
/// but never performs the computation itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Simplify the expression with the evaluating engine.
    Eval(Expr),

    /// Simplify the expression with the distributive engine, expanding products of sums.
    Expand(Expr),

    /// Differentiate the expression `grade` times with respect to `variable`.
    Diff {
        expr: Expr,
        variable: Expr,
        grade: u32,
    },
}

impl Algorithm {
    /// Creates the first derivative of the expression with respect to `x`.
    pub fn diff(expr: Expr) -> Self {
        Self::Diff { expr, variable: symbol("x"), grade: 1 }
    }

    /// Performs the computation.
    ///
    /// If the expression cannot be differentiated, the unevaluated [`Algorithm::Diff`] is
    /// returned as an expression.
    pub fn evaluate(&self) -> Expr {
        match self {
            Self::Eval(expr) => Engine::evaluating().simplify(expr),
            Self::Expand(expr) => Engine::distributive().simplify(expr),
            Self::Diff { expr, variable, grade } => derivative(expr, variable, *grade)
                .unwrap_or_else(|_| Expr::Algorithm(Box::new(self.clone()))),
        }
    }
}

impl From<Algorithm> for Expr {
    fn from(algorithm: Algorithm) -> Self {
        Self::Algorithm(Box::new(algorithm))
    }
}
