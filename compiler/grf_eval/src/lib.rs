#![deny(clippy::arithmetic_side_effects)]
//! GRF Eval - compile-time constant scoping and expression reduction.
//!
//! # Architecture
//!
//! - `ScopeStack`: layered identifier → value table. Layers are pushed through
//!   `ScopeStack::enter`, whose guard pops the layer on every exit path.
//! - `Reducer`: reduces an `Expr` against a `ScopeStack`. The caller picks the
//!   stage up front with `UnknownIds`: `Fatal` rejects unknown identifiers,
//!   `Defer` leaves them in a `Reduced::Pending` expression for a later pass.
//! - Comprehensions (`[body for param in source]`) are expanded by
//!   `Reducer::expand`, which rebinds the loop variable in a transient layer.
//! - `evaluate_binary` / `evaluate_unary`: checked integer operators.

mod comprehension;
mod errors;
mod operators;
mod reduce;
mod scope;
mod stack;

pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use operators::{evaluate_binary, evaluate_unary};
pub use reduce::{Reduced, Reducer, UnknownIds};
pub use scope::{LayerGuard, ScopeLayer, ScopeStack};
pub use stack::ensure_sufficient_stack;

#[cfg(test)]
mod tests;
