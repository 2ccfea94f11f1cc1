//! Errors reported when an operation is called with arguments outside of its domain.

use crate::symbolic::expr::Expr;
use rug::Integer;
use thiserror::Error;

/// An argument passed to one of the integer operations does not satisfy its precondition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// The GCD and LCM solvers only accept positive integers.
    #[error("{0} is not positive")]
    NotPositive(Integer),

    /// Only integers greater than 1 can be factorized.
    #[error("cannot factorize {0}: the number must be greater than 1")]
    NotFactorizable(Integer),

    /// Integers can only be written in radixes 2 through 64.
    #[error("radix must be between 2 and 64, got {0}")]
    InvalidRadix(u8),
}

/// The derivative of an expression could not be computed symbolically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivativeError {
    /// The expression may be differentiable, but computing its derivative symbolically is not
    /// supported.
    #[error("cannot differentiate {0}")]
    Unsupported(Expr),
}
