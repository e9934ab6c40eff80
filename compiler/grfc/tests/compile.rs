//! End-to-end compilation through `Session`.

use std::cell::Cell;

use grf_diagnostic::{DiagnosticConfig, ErrorCode, Severity};
use grf_ir::{
    BinaryOp, ConstDef, Expr, Feature, FeatureSet, Identifier, LayoutField, LayoutSprite, Member,
    Span, SpriteLayout, Statement, StringInterner, Structure, Value,
};
use grfc::{CompileOptions, Session};
use pretty_assertions::assert_eq;

/// Builds statements with names from a session's interner.
struct Ast<'a> {
    interner: &'a StringInterner,
    next: Cell<u32>,
}

impl<'a> Ast<'a> {
    fn new(session: &'a Session) -> Self {
        Ast {
            interner: session.interner(),
            next: Cell::new(0),
        }
    }

    fn span(&self) -> Span {
        let start = self.next.get();
        self.next.set(start + 4);
        Span::new(start, start + 3)
    }

    fn ident(&self, text: &str) -> Identifier {
        Identifier::new(self.interner.intern(text), self.span())
    }

    fn var(&self, text: &str) -> Expr {
        Expr::ident(self.ident(text))
    }

    fn int(&self, value: i64) -> Expr {
        Expr::int(value, self.span())
    }

    fn constant(&self, name: &str, value: Expr) -> Statement {
        Statement::Const(ConstDef {
            name: self.ident(name),
            value,
            span: self.span(),
        })
    }

    fn structure(&self, name: &str, body: Vec<Statement>) -> Statement {
        let span = self.span();
        Statement::Structure(Structure::new(self.ident(name), body, None, span))
    }

    fn member(&self, name: &str, value: Expr) -> Statement {
        Statement::Member(Member::new(self.var(name), value))
    }

    fn layout(&self, name: &str, params: &[&str], fields: Vec<Expr>) -> Statement {
        let sprite = LayoutSprite {
            kind: self.ident("ground"),
            fields: fields
                .into_iter()
                .map(|value| LayoutField {
                    name: self.ident("sprite"),
                    value,
                })
                .collect(),
            span: self.span(),
        };
        let params = params.iter().map(|p| self.var(p)).collect();
        Statement::Layout(SpriteLayout::new(self.ident(name), params, vec![sprite], self.span()))
    }
}

fn feature(value: u8) -> Feature {
    Feature::new(value).unwrap_or(Feature::RESERVED)
}

fn features(values: &[u8]) -> FeatureSet {
    values.iter().map(|v| feature(*v)).collect()
}

/// Expected payload of a layout with a single sprite.
fn payload(feature: u8, values: &[i32]) -> Vec<u8> {
    let mut out = vec![feature, 1, u8::try_from(values.len()).unwrap_or(u8::MAX)];
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

#[test]
fn comprehension_layout_is_generated_per_feature() {
    let session = Session::new(CompileOptions::new().with_features(features(&[0x11, 0x04, 0x07])));
    let ast = Ast::new(&session);

    // const BASE = 10;
    // spritelayout farm { ground { sprite: [v, v * 2 for v in [BASE, 20, 30]]; } }
    let source = Expr::array(vec![ast.var("BASE"), ast.int(20), ast.int(30)], ast.span());
    let double = Expr::binary(BinaryOp::Mul, ast.var("v"), ast.int(2));
    let comprehension =
        Expr::comprehension(vec![ast.var("v"), double], ast.ident("v"), source, ast.span());
    let program = vec![
        ast.constant("BASE", ast.int(10)),
        ast.layout("farm", &[], vec![comprehension]),
    ];

    let output = session.compile(&program);

    assert!(output.is_ok(), "{:?}", output.diagnostics);
    let emitted: Vec<_> = output
        .actions
        .iter()
        .map(|action| (action.feature.value(), action.payload.clone()))
        .collect();
    let expected = [10, 20, 20, 40, 30, 60];
    assert_eq!(
        emitted,
        vec![(0x07, payload(0x07, &expected)), (0x11, payload(0x11, &expected))]
    );
}

#[test]
fn bound_layouts_see_arguments_and_feature_variables() {
    let options = CompileOptions::new()
        .with_feature(feature(0x01))
        .with_feature(feature(0x02))
        .with_feature_variable(feature(0x01), "offset", Value::Int(100))
        .with_feature_variable(feature(0x02), "offset", Value::Int(200))
        .with_layout_arguments("tile", vec![Value::Int(5)]);
    let session = Session::new(options);
    let ast = Ast::new(&session);

    let sum = Expr::binary(BinaryOp::Add, ast.var("x"), ast.var("offset"));
    let program = vec![ast.layout("tile", &["x"], vec![sum])];

    let output = session.compile(&program);

    assert!(output.is_ok(), "{:?}", output.diagnostics);
    let payloads: Vec<_> = output.actions.into_iter().map(|a| a.payload).collect();
    assert_eq!(payloads, vec![payload(0x01, &[105]), payload(0x02, &[205])]);
}

#[test]
fn unbound_parameterized_layouts_produce_nothing() {
    let session = Session::new(CompileOptions::new().with_feature(feature(0x01)));
    let ast = Ast::new(&session);
    let program = vec![
        ast.layout("tile", &["x"], vec![ast.var("x")]),
        ast.layout("plain", &[], vec![ast.int(1)]),
    ];

    let output = session.compile(&program);

    assert!(output.is_ok());
    let payloads: Vec<_> = output.actions.into_iter().map(|a| a.payload).collect();
    assert_eq!(payloads, vec![payload(0x01, &[1])]);
}

#[test]
fn duplicate_parameters_fail_before_generation() {
    let session = Session::new(CompileOptions::new().with_feature(feature(0x01)));
    let ast = Ast::new(&session);
    let first = ast.layout("plain", &[], vec![ast.int(1)]);
    let second = ast.layout("tile", &["x", "y", "x"], vec![ast.int(2)]);
    let second_x = match &second {
        Statement::Layout(layout) => layout.params[2].span,
        _ => Span::DUMMY,
    };

    let output = session.compile(&[first, second]);

    assert!(!output.is_ok());
    assert!(output.actions.is_empty());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E2002);
    assert_eq!(output.diagnostics[0].primary_span(), Some(second_x));
}

#[test]
fn argument_count_must_match_parameters() {
    let options = CompileOptions::new()
        .with_feature(feature(0x01))
        .with_layout_arguments("tile", vec![Value::Int(1), Value::Int(2)]);
    let session = Session::new(options);
    let ast = Ast::new(&session);

    let output = session.compile(&[ast.layout("tile", &["x"], vec![ast.var("x")])]);

    assert_eq!(output.diagnostics[0].code, ErrorCode::E1002);
    assert_eq!(
        output.diagnostics[0].message,
        "layout `tile` takes 1 argument(s), 2 given"
    );
}

#[test]
fn every_failing_layout_is_reported() {
    let options = CompileOptions::new()
        .with_feature(feature(0x01))
        .with_diagnostics(DiagnosticConfig::unlimited());
    let session = Session::new(options);
    let ast = Ast::new(&session);
    let program = vec![
        ast.layout("tile", &["x", "x"], vec![ast.int(1)]),
        ast.layout("plain", &[], vec![ast.int(2)]),
        ast.layout("road", &["y", "y"], vec![ast.int(3)]),
    ];

    let output = session.compile(&program);

    assert!(output.failed.is_some());
    assert!(output.actions.is_empty());
    let codes: Vec<_> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2002, ErrorCode::E2002]);
}

#[test]
fn generation_errors_of_later_layouts_are_still_reported() {
    let session = Session::new(CompileOptions::new().with_feature(feature(0x01)));
    let ast = Ast::new(&session);
    let program = vec![
        ast.layout("farm", &[], vec![ast.var("missing")]),
        ast.layout("plain", &[], vec![ast.int(2)]),
        ast.layout("road", &[], vec![Expr::binary(BinaryOp::Div, ast.int(1), ast.int(0))]),
    ];

    let output = session.compile(&program);

    assert!(!output.is_ok());
    assert!(output.actions.is_empty());
    let codes: Vec<_> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2004, ErrorCode::E6001]);
}

#[test]
fn error_limit_cuts_reporting_short() {
    let options = CompileOptions::new()
        .with_feature(feature(0x01))
        .with_diagnostics(DiagnosticConfig { error_limit: 1 });
    let session = Session::new(options);
    let ast = Ast::new(&session);
    let program = vec![
        ast.layout("tile", &["x", "x"], vec![ast.int(1)]),
        ast.layout("road", &["y", "y"], vec![ast.int(2)]),
        ast.layout("farm", &["z", "z"], vec![ast.int(3)]),
    ];

    let output = session.compile(&program);

    let codes: Vec<_> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2002, ErrorCode::E9002]);
    assert_eq!(output.diagnostics[1].message, "aborting due to 1 previous errors");
}

#[test]
fn arguments_for_unknown_layouts_are_warned_about() {
    let options = CompileOptions::new()
        .with_feature(feature(0x01))
        .with_layout_arguments("tiel", vec![Value::Int(5)])
        .with_layout_arguments("ghost", vec![]);
    let session = Session::new(options);
    let ast = Ast::new(&session);

    let output = session.compile(&[ast.layout("plain", &[], vec![ast.int(1)])]);

    assert!(output.is_ok(), "{:?}", output.diagnostics);
    assert_eq!(output.actions.len(), 1);
    let warnings: Vec<_> = output
        .diagnostics
        .iter()
        .map(|d| (d.severity, d.code, d.message.as_str()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            (
                Severity::Warning,
                ErrorCode::E2007,
                "arguments are configured for unknown layout `ghost`"
            ),
            (
                Severity::Warning,
                ErrorCode::E2007,
                "arguments are configured for unknown layout `tiel`"
            ),
        ]
    );
}

#[test]
fn registration_errors_become_diagnostics() {
    let session = Session::new(CompileOptions::new().with_builtin("TILE", Value::Int(16)));
    let ast = Ast::new(&session);
    let program = vec![
        ast.structure("house", vec![ast.member("width", ast.var("TILE"))]),
        ast.structure("house", vec![]),
    ];

    let output = session.compile(&program);

    assert!(output.failed.is_some());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E2001);
    assert_eq!(output.diagnostics[0].labels.len(), 2);

    let house = output
        .namespace
        .structure(session.interner().intern("house"))
        .map(|s| s.members.get(session.interner().intern("width")).cloned());
    assert_eq!(house, Some(Some(Value::Int(16))));
}

#[test]
fn sessions_do_not_share_definitions() {
    for _ in 0..2 {
        let session = Session::new(CompileOptions::new());
        let ast = Ast::new(&session);
        let output = session.compile(&[ast.constant("SPEED", ast.int(3))]);
        assert!(output.is_ok(), "{:?}", output.diagnostics);
    }
}

#[test]
fn recompiling_in_one_session_starts_fresh() {
    let session = Session::new(CompileOptions::new());
    let ast = Ast::new(&session);
    let program = vec![ast.structure("house", vec![ast.member("width", ast.int(2))])];

    assert!(session.compile(&program).is_ok());
    assert!(session.compile(&program).is_ok());
}

#[test]
fn tracing_can_be_initialized_repeatedly() {
    grfc::init_tracing();
    grfc::init_tracing();
}
