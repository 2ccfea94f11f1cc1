use super::{Algorithm, Expr};

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first).
///
/// The children of a [`Expr::RationalPow`] or [`Expr::RationalProduct`] are the bases of its
/// powers; exponents are plain numbers and are not visited.
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

/// Returns the children of the expression, in left-to-right order.
fn children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Primary(_) => Vec::new(),
        Expr::Add(items) | Expr::Mul(items) | Expr::Vector(items) => items.iter().collect(),
        Expr::Exp(lhs, rhs)
            | Expr::Gcd(lhs, rhs)
            | Expr::Lcm(lhs, rhs)
            | Expr::DotProduct(lhs, rhs) => vec![&**lhs, &**rhs],
        Expr::RationalPow(pow) => vec![&pow.base],
        Expr::RationalProduct(components) => components.iter().map(|pow| &pow.base).collect(),
        Expr::Algorithm(algorithm) => match &**algorithm {
            Algorithm::Eval(inner) | Algorithm::Expand(inner) => vec![inner],
            Algorithm::Diff { expr, .. } => vec![expr],
        },
        Expr::Function(_, args) => args.iter().collect(),
        Expr::Compare(lhs, _, rhs) => vec![&**lhs, &**rhs],
    }
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: &'a Expr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let children = children(expr);
            match children.last().copied() {
                Some(last) if !self.is_last_visited(last) => {
                    self.stack.extend(children.into_iter().rev());
                },
                _ => return self.visit(),
            }
        }
    }
}
