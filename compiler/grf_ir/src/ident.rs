//! Position-tagged identifier tokens.

use std::hash::{Hash, Hasher};

use crate::{Name, Span};

/// An identifier token: an interned name plus where it was written.
///
/// Equality and hashing look at the name only, so the same identifier
/// written at two places compares equal.
#[derive(Copy, Clone, Debug)]
pub struct Identifier {
    pub name: Name,
    pub span: Span,
}

impl Identifier {
    #[inline]
    pub const fn new(name: Name, span: Span) -> Self {
        Identifier { name, span }
    }
}

impl PartialEq for Identifier {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
