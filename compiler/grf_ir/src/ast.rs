//! Statement nodes produced by the parser.
//!
//! Statements are registered in document order. Names that must be
//! identifiers (member names, layout parameters) are kept as `Expr` so the
//! registration pass can report a misuse instead of the parser guessing.

use crate::{Expr, Identifier, Span};

/// A top-level or nested statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Const(ConstDef),
    Member(Member),
    Structure(Structure),
    Call(StructureCall),
    Layout(SpriteLayout),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Const(c) => c.span,
            Statement::Member(m) => m.span(),
            Statement::Structure(s) => s.span,
            Statement::Call(c) => c.span,
            Statement::Layout(l) => l.span,
        }
    }
}

/// `const NAME = value;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstDef {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

/// `name = value;` inside a structure, call or initiator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: Expr,
    pub value: Expr,
}

impl Member {
    pub fn new(name: Expr, value: Expr) -> Self {
        Member { name, value }
    }

    /// Members are positioned at their name.
    #[inline]
    pub fn span(&self) -> Span {
        self.name.span
    }
}

/// `init { ... }`: one-time setup statements of a structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Initiator {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Initiator {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Initiator { statements, span }
    }
}

/// `struct Name { init { ... } statements... }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    pub id: Identifier,
    pub initiator: Initiator,
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Structure {
    /// A structure without an `init` block gets an empty one.
    pub fn new(
        id: Identifier,
        statements: Vec<Statement>,
        initiator: Option<Initiator>,
        span: Span,
    ) -> Self {
        Structure {
            id,
            initiator: initiator.unwrap_or_else(|| Initiator::new(Vec::new(), span)),
            statements,
            span,
        }
    }
}

/// `Name::init ( statements... );`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureCall {
    pub name: Identifier,
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl StructureCall {
    pub fn new(name: Identifier, statements: Vec<Statement>, span: Span) -> Self {
        StructureCall {
            name,
            statements,
            span,
        }
    }
}

/// `spritelayout name(params..) { sprites.. }`
///
/// Sprite contents may reference feature variables, so they are never
/// reduced when the layout is registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteLayout {
    pub name: Identifier,
    pub params: Vec<Expr>,
    pub sprites: Vec<LayoutSprite>,
    pub span: Span,
}

impl SpriteLayout {
    pub fn new(
        name: Identifier,
        params: Vec<Expr>,
        sprites: Vec<LayoutSprite>,
        span: Span,
    ) -> Self {
        SpriteLayout {
            name,
            params,
            sprites,
            span,
        }
    }
}

/// One sprite entry of a layout, e.g. `ground { sprite: 3; }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutSprite {
    pub kind: Identifier,
    pub fields: Vec<LayoutField>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutField {
    pub name: Identifier,
    pub value: Expr,
}
