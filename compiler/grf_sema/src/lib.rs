//! GRF Sema - registration of compile-time objects and layout dispatch.
//!
//! # Architecture
//!
//! - `Registrar`: walks statements in document order, registering constants,
//!   members, structures, structure calls and layouts into a `Namespace`.
//!   The constant scope is an explicit `ScopeStack` passed by reference;
//!   every structure body and call runs in a layer that is popped on exit.
//! - `layout`: parameter validation and per-feature action generation. Action
//!   encoding is delegated to an `ActionEncoder`, which reduces layout
//!   contents lazily, once per feature.

mod errors;
pub mod layout;
mod namespace;
mod registrar;

pub use errors::{ErrorCategory, SemaError, SemaErrorKind, SemaResult};
pub use layout::{generate_actions, validate_parameters, Action, ActionEncoder};
pub use namespace::{MemberTable, Namespace, RegisteredStructure, StructureInstance};
pub use registrar::{Registrar, StructureState};
