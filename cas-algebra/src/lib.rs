//! Exact symbolic simplification of algebraic expressions.
//!
//! Expressions are reduced to a canonical form without ever leaving exact arithmetic: integers are
//! arbitrary precision, rationals are kept in lowest terms, and real numbers such as `12^(1/2)`
//! or `5 / pi` are kept as products of powers with rational exponents.
//!
//! See the [`symbolic`] module to get started.

pub mod error;
pub mod integer;
pub mod primitive;
pub mod symbolic;
