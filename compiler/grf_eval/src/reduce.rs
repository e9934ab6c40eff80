//! Expression reduction.
//!
//! Reduction folds an `Expr` as far as the current scope allows. Whether an
//! identifier missing from every layer is an error or simply left for a later
//! stage is decided by the caller through `UnknownIds`, never by inspecting
//! the failure afterwards.

use grf_ir::{Expr, ExprKind, Span, StringInterner, Value};

use crate::{evaluate_binary, evaluate_unary, ensure_sufficient_stack};
use crate::{EvalError, EvalResult, ScopeStack};

/// What to do with identifiers that resolve in no active layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnknownIds {
    /// Report `UndefinedIdentifier`.
    Fatal,
    /// Keep the identifier; the result is `Reduced::Pending`.
    Defer,
}

/// Outcome of reducing an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reduced {
    /// Fully resolved, feature-independent value.
    Value(Value),
    /// Partially reduced expression waiting on a later stage.
    Pending(Expr),
}

impl Reduced {
    /// The resolved value, if any.
    #[inline]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Reduced::Value(value) => Some(value),
            Reduced::Pending(_) => None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Reduced::Pending(_))
    }

    /// Turn the result back into an expression positioned at `span`.
    pub fn into_expr(self, span: Span) -> Expr {
        match self {
            Reduced::Value(value) => Expr::constant(value, span),
            Reduced::Pending(expr) => expr,
        }
    }
}

/// Reduces expressions against a `ScopeStack`.
///
/// The interner is only used to name identifiers in error messages.
#[derive(Copy, Clone)]
pub struct Reducer<'a> {
    interner: &'a StringInterner,
    unknown_ids: UnknownIds,
}

impl<'a> Reducer<'a> {
    pub fn new(interner: &'a StringInterner, unknown_ids: UnknownIds) -> Self {
        Reducer {
            interner,
            unknown_ids,
        }
    }

    /// Reducer for stages where every identifier must already be known.
    pub fn fatal(interner: &'a StringInterner) -> Self {
        Self::new(interner, UnknownIds::Fatal)
    }

    /// Reducer for stages that may leave identifiers for later.
    pub fn deferred(interner: &'a StringInterner) -> Self {
        Self::new(interner, UnknownIds::Defer)
    }

    #[inline]
    pub fn unknown_ids(&self) -> UnknownIds {
        self.unknown_ids
    }

    #[inline]
    pub(crate) fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Reduce `expr` as far as `scopes` allows.
    pub fn reduce(&self, expr: &Expr, scopes: &mut ScopeStack) -> EvalResult<Reduced> {
        ensure_sufficient_stack(|| self.reduce_inner(expr, scopes))
    }

    /// Reduce `expr` to a value; a result still waiting on a later stage is
    /// an error.
    pub fn reduce_value(&self, expr: &Expr, scopes: &mut ScopeStack) -> EvalResult<Value> {
        match self.reduce(expr, scopes)? {
            Reduced::Value(value) => Ok(value),
            Reduced::Pending(pending) => Err(EvalError::unresolved(pending.span)),
        }
    }

    fn reduce_inner(&self, expr: &Expr, scopes: &mut ScopeStack) -> EvalResult<Reduced> {
        match &expr.kind {
            ExprKind::Const(value) => Ok(Reduced::Value(value.clone())),

            ExprKind::Ident(ident) => match scopes.resolve(ident.name) {
                Some(value) => Ok(Reduced::Value(value.clone())),
                None => match self.unknown_ids {
                    UnknownIds::Fatal => Err(EvalError::undefined_identifier(
                        &self.interner.lookup(ident.name),
                        ident.span,
                    )),
                    UnknownIds::Defer => Ok(Reduced::Pending(expr.clone())),
                },
            },

            ExprKind::Array(items) => {
                let reduced = items
                    .iter()
                    .map(|item| self.reduce(item, scopes))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(collect_array(reduced, expr.span))
            }

            ExprKind::Unary { op, operand } => match self.reduce(operand, scopes)? {
                Reduced::Value(Value::Int(n)) => evaluate_unary(*op, n)
                    .map(|n| Reduced::Value(Value::Int(n)))
                    .map_err(|kind| EvalError::new(kind, expr.span)),
                Reduced::Value(other) => Err(EvalError::type_mismatch(
                    "int",
                    other.type_name(),
                    operand.span,
                )),
                Reduced::Pending(operand) => {
                    Ok(Reduced::Pending(Expr::unary(*op, operand, expr.span)))
                }
            },

            ExprKind::Binary { op, left, right } => {
                let lhs = self.reduce(left, scopes)?;
                let rhs = self.reduce(right, scopes)?;
                for (side, reduced) in [(left, &lhs), (right, &rhs)] {
                    if let Some(Value::Array(_)) = reduced.value() {
                        return Err(EvalError::type_mismatch("int", "array", side.span));
                    }
                }
                match (lhs, rhs) {
                    (Reduced::Value(Value::Int(l)), Reduced::Value(Value::Int(r))) => {
                        evaluate_binary(*op, l, r)
                            .map(|n| Reduced::Value(Value::Int(n)))
                            .map_err(|kind| EvalError::new(kind, expr.span))
                    }
                    (lhs, rhs) => Ok(Reduced::Pending(Expr::new(
                        ExprKind::Binary {
                            op: *op,
                            left: Box::new(lhs.into_expr(left.span)),
                            right: Box::new(rhs.into_expr(right.span)),
                        },
                        expr.span,
                    ))),
                }
            }

            ExprKind::Comprehension {
                body,
                param,
                source,
            } => self.expand(source, *param, body, scopes, expr.span),
        }
    }
}

/// Build an array result: a value when every element resolved, otherwise a
/// pending array literal.
pub(crate) fn collect_array(items: Vec<Reduced>, span: Span) -> Reduced {
    if items.iter().all(|item| !item.is_pending()) {
        let values = items
            .into_iter()
            .filter_map(|item| match item {
                Reduced::Value(value) => Some(value),
                Reduced::Pending(_) => None,
            })
            .collect();
        return Reduced::Value(Value::Array(values));
    }
    let exprs = items.into_iter().map(|item| item.into_expr(span)).collect();
    Reduced::Pending(Expr::array(exprs, span))
}
