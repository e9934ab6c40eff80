//! Array comprehension expansion.
//!
//! `[a, b for v in source]` unrolls into `[a(v0), b(v0), a(v1), b(v1), ...]`:
//! element-major, then body-expression order.

use grf_ir::{Expr, ExprKind, Identifier, Name, Span, Value};

use crate::reduce::collect_array;
use crate::{
    ensure_sufficient_stack, EvalError, EvalResult, Reduced, Reducer, ScopeLayer, ScopeStack,
};

impl Reducer<'_> {
    /// Expand a comprehension over `source`, binding `param` once per element.
    ///
    /// The source is reduced against the current scope. The loop variable lives
    /// in a layer of its own that is popped before this returns, whether the
    /// body reduced or failed. An empty source performs no body reductions.
    ///
    /// A source that is still pending (only possible with `UnknownIds::Defer`)
    /// leaves the whole comprehension pending. Its body keeps the values that
    /// are bound now, such as the variables of enclosing loops, since those
    /// layers are gone by the time the later stage reduces it.
    pub fn expand(
        &self,
        source: &Expr,
        param: Identifier,
        body: &[Expr],
        scopes: &mut ScopeStack,
        span: Span,
    ) -> EvalResult<Reduced> {
        let elements = match self.reduce(source, scopes)? {
            Reduced::Value(Value::Array(elements)) => elements,
            Reduced::Value(other) => {
                return Err(EvalError::type_mismatch("array", other.type_name(), source.span));
            }
            Reduced::Pending(source) => {
                let mut hidden = vec![param.name];
                let body = body
                    .iter()
                    .map(|expr| capture_bound(expr, scopes, &mut hidden))
                    .collect();
                return Ok(Reduced::Pending(Expr::comprehension(body, param, source, span)));
            }
        };

        if elements.is_empty() {
            return Ok(Reduced::Value(Value::Array(Vec::new())));
        }

        let mut out = Vec::with_capacity(elements.len().saturating_mul(body.len()));
        let mut scope = scopes.enter(ScopeLayer::with_binding(param.name, Value::Int(0)));
        for element in elements {
            tracing::trace!(
                param = &*self.interner().lookup(param.name),
                %element,
                "comprehension iteration"
            );
            scope.define(param.name, element);
            for expr in body {
                out.push(self.reduce(expr, &mut scope)?);
            }
        }
        drop(scope);

        Ok(collect_array(out, span))
    }
}

/// Replace the identifiers `scopes` binds with their values. Names in
/// `hidden` are loop variables of comprehensions being rebuilt and stay
/// identifiers.
fn capture_bound(expr: &Expr, scopes: &ScopeStack, hidden: &mut Vec<Name>) -> Expr {
    ensure_sufficient_stack(|| match &expr.kind {
        ExprKind::Const(_) => expr.clone(),
        ExprKind::Ident(ident) => match scopes.resolve(ident.name) {
            Some(value) if !hidden.contains(&ident.name) => {
                Expr::constant(value.clone(), expr.span)
            }
            _ => expr.clone(),
        },
        ExprKind::Array(items) => Expr::array(
            items
                .iter()
                .map(|item| capture_bound(item, scopes, hidden))
                .collect(),
            expr.span,
        ),
        ExprKind::Unary { op, operand } => {
            Expr::unary(*op, capture_bound(operand, scopes, hidden), expr.span)
        }
        ExprKind::Binary { op, left, right } => Expr::new(
            ExprKind::Binary {
                op: *op,
                left: Box::new(capture_bound(left, scopes, hidden)),
                right: Box::new(capture_bound(right, scopes, hidden)),
            },
            expr.span,
        ),
        ExprKind::Comprehension {
            body,
            param,
            source,
        } => {
            let source = capture_bound(source, scopes, hidden);
            hidden.push(param.name);
            let body = body
                .iter()
                .map(|item| capture_bound(item, scopes, hidden))
                .collect();
            hidden.pop();
            Expr::comprehension(body, *param, source, expr.span)
        }
    })
}
