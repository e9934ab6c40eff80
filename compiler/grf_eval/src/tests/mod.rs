//! Reducer tests, kept out of the implementation files.


use grf_ir::{Expr, Identifier, Span, StringInterner};

/// Interner plus helpers for building small expression trees.
pub(crate) struct Fixture {
    pub(crate) interner: StringInterner,
    next: std::cell::Cell<u32>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Fixture {
            interner: StringInterner::new(),
            next: std::cell::Cell::new(0),
        }
    }

    /// A fresh one-character-wide span, so every node gets its own position.
    pub(crate) fn span(&self) -> Span {
        let start = self.next.get();
        self.next.set(start.saturating_add(2));
        Span::new(start, start.saturating_add(1))
    }

    pub(crate) fn ident(&self, text: &str) -> Identifier {
        Identifier::new(self.interner.intern(text), self.span())
    }

    pub(crate) fn var(&self, text: &str) -> Expr {
        Expr::ident(self.ident(text))
    }

    pub(crate) fn int(&self, value: i64) -> Expr {
        Expr::int(value, self.span())
    }

    pub(crate) fn ints(&self, values: &[i64]) -> Expr {
        Expr::array(values.iter().map(|v| self.int(*v)).collect(), self.span())
    }
}
