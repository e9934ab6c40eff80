//! GRF IR - syntax tree and value types for the layout compiler.
//!
//! This crate contains the data structures shared by every compiler phase:
//! - Spans for source locations
//! - Names for interned identifiers, and the `StringInterner` behind them
//! - `Identifier`, the position-tagged name token
//! - `Expr`, the tagged-variant expression tree
//! - `Value`, the resolved compile-time constant
//! - Statement nodes (`Member`, `Structure`, `SpriteLayout`, ...)
//! - `Feature` and `FeatureSet`, the target feature bitmask
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifier text is stored once, compared as `Name(u32)`
//! - **Resolved vs Pending**: a resolved constant is a `Value`; anything that
//!   may still depend on a later stage stays an `Expr`

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod expr;
mod feature;
mod ident;
mod interner;
mod name;
mod span;
mod value;

pub use ast::{
    ConstDef, Initiator, LayoutField, LayoutSprite, Member, SpriteLayout, Statement, Structure,
    StructureCall,
};
pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use feature::{Feature, FeatureSet};
pub use ident::Identifier;
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;
pub use value::Value;
