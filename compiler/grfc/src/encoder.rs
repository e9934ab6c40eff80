//! Reference layout encoder.
//!
//! Payload layout of one action:
//!
//! ```text
//! feature: u8
//! sprite count: u8
//! per sprite:
//!     value count: u8
//!     values: i32 (little endian) * value count
//! ```
//!
//! Every field of a sprite is reduced and its integers flattened in field
//! order, so an array field contributes all of its elements.

use rustc_hash::FxHashMap;

use grf_eval::{Reducer, ScopeLayer, ScopeStack};
use grf_ir::{Feature, Name, Span, SpriteLayout, StringInterner};
use grf_sema::{Action, ActionEncoder, SemaError, SemaErrorKind, SemaResult};

/// Encodes layouts against the global constants, the target feature's
/// variables and the layout's bound arguments, innermost last.
pub struct LayoutEncoder<'a> {
    interner: &'a StringInterner,
    scopes: ScopeStack,
    feature_variables: FxHashMap<Feature, ScopeLayer>,
    arguments: FxHashMap<Name, ScopeLayer>,
}

impl<'a> LayoutEncoder<'a> {
    pub fn new(
        interner: &'a StringInterner,
        scopes: ScopeStack,
        feature_variables: FxHashMap<Feature, ScopeLayer>,
    ) -> Self {
        LayoutEncoder {
            interner,
            scopes,
            feature_variables,
            arguments: FxHashMap::default(),
        }
    }

    /// Bind a layout's parameters for every feature it is encoded for.
    pub fn bind_arguments(&mut self, layout: Name, arguments: ScopeLayer) {
        self.arguments.insert(layout, arguments);
    }
}

impl ActionEncoder for LayoutEncoder<'_> {
    /// A parameterized layout is only output once something binds it.
    fn prepare_output(&mut self, layout: &SpriteLayout) -> bool {
        layout.params.is_empty() || self.arguments.contains_key(&layout.name.name)
    }

    fn encode_layout(
        &mut self,
        layout: &SpriteLayout,
        feature: Feature,
    ) -> SemaResult<Vec<Action>> {
        let variables = self
            .feature_variables
            .get(&feature)
            .cloned()
            .unwrap_or_default();
        let arguments = self
            .arguments
            .get(&layout.name.name)
            .cloned()
            .unwrap_or_default();
        let reducer = Reducer::fatal(self.interner);

        let mut feature_scope = self.scopes.enter(variables);
        let mut scope = feature_scope.enter(arguments);

        let sprite_count = count_byte("sprite count", layout.sprites.len(), layout.span)?;
        let mut payload = vec![feature.value(), sprite_count];
        for sprite in &layout.sprites {
            let mut values = Vec::new();
            for field in &sprite.fields {
                values.extend(reducer.reduce_value(&field.value, &mut scope)?.flatten_ints());
            }
            payload.push(count_byte("sprite value count", values.len(), sprite.span)?);
            for value in values {
                let encoded = i32::try_from(value).map_err(|_| {
                    SemaError::new(
                        SemaErrorKind::ValueOutOfRange {
                            what: "sprite value",
                            value,
                        },
                        sprite.span,
                    )
                })?;
                payload.extend_from_slice(&encoded.to_le_bytes());
            }
        }

        Ok(vec![Action { feature, payload }])
    }
}

fn count_byte(what: &'static str, count: usize, span: Span) -> SemaResult<u8> {
    u8::try_from(count).map_err(|_| {
        SemaError::new(
            SemaErrorKind::ValueOutOfRange {
                what,
                value: i64::try_from(count).unwrap_or(i64::MAX),
            },
            span,
        )
    })
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

    use super::*;
    use grf_ir::{Expr, Identifier, LayoutField, LayoutSprite, Value};
    use pretty_assertions::assert_eq;

    fn sprite(interner: &StringInterner, fields: Vec<Expr>) -> LayoutSprite {
        LayoutSprite {
            kind: Identifier::new(interner.intern("ground"), Span::new(0, 6)),
            fields: fields
                .into_iter()
                .map(|value| LayoutField {
                    name: Identifier::new(interner.intern("sprite"), Span::new(0, 6)),
                    value,
                })
                .collect(),
            span: Span::new(0, 20),
        }
    }

    fn layout(
        interner: &StringInterner,
        params: &[&str],
        sprites: Vec<LayoutSprite>,
    ) -> SpriteLayout {
        let params = params
            .iter()
            .map(|p| Expr::ident(Identifier::new(interner.intern(p), Span::new(1, 2))))
            .collect();
        SpriteLayout::new(
            Identifier::new(interner.intern("farm"), Span::new(0, 4)),
            params,
            sprites,
            Span::new(0, 40),
        )
    }

    fn feature(value: u8) -> Feature {
        Feature::new(value).unwrap()
    }

    #[test]
    fn parameterized_layouts_need_bound_arguments() {
        let interner = StringInterner::new();
        let plain = layout(&interner, &[], Vec::new());
        let parameterized = layout(&interner, &["x"], Vec::new());
        let mut encoder =
            LayoutEncoder::new(&interner, ScopeStack::default(), FxHashMap::default());

        assert!(encoder.prepare_output(&plain));
        assert!(!encoder.prepare_output(&parameterized));

        encoder.bind_arguments(parameterized.name.name, ScopeLayer::new());
        assert!(encoder.prepare_output(&parameterized));
    }

    #[test]
    fn payload_flattens_sprite_fields() {
        let interner = StringInterner::new();
        let ground = sprite(
            &interner,
            vec![
                Expr::int(3, Span::new(8, 9)),
                Expr::constant(Value::int_array([-1, 2]), Span::new(10, 16)),
            ],
        );
        let farm = layout(&interner, &[], vec![ground]);
        let mut encoder =
            LayoutEncoder::new(&interner, ScopeStack::default(), FxHashMap::default());

        let actions = encoder.encode_layout(&farm, feature(0x07)).unwrap();

        let mut expected = vec![0x07, 1, 3];
        for n in [3i32, -1, 2] {
            expected.extend_from_slice(&n.to_le_bytes());
        }
        assert_eq!(
            actions,
            vec![Action {
                feature: feature(0x07),
                payload: expected,
            }]
        );
    }

    #[test]
    fn feature_variables_are_scoped_to_their_feature() {
        let interner = StringInterner::new();
        let offset = interner.intern("offset");
        let field = Expr::ident(Identifier::new(offset, Span::new(8, 14)));
        let farm = layout(&interner, &[], vec![sprite(&interner, vec![field])]);

        let mut variables = FxHashMap::default();
        variables.insert(feature(0x07), ScopeLayer::with_binding(offset, Value::Int(9)));
        let mut encoder = LayoutEncoder::new(&interner, ScopeStack::default(), variables);

        let actions = encoder.encode_layout(&farm, feature(0x07)).unwrap();
        assert_eq!(actions[0].payload[3..].to_vec(), 9i32.to_le_bytes().to_vec());

        let err = encoder.encode_layout(&farm, feature(0x08)).unwrap_err();
        assert_eq!(err.span, Span::new(8, 14));
        assert_eq!(encoder.scopes.depth(), 1);
    }

    #[test]
    fn values_outside_i32_are_rejected() {
        let interner = StringInterner::new();
        let big = Expr::int(i64::from(i32::MAX) + 1, Span::new(8, 18));
        let farm = layout(&interner, &[], vec![sprite(&interner, vec![big])]);
        let mut encoder =
            LayoutEncoder::new(&interner, ScopeStack::default(), FxHashMap::default());

        let err = encoder.encode_layout(&farm, feature(0x07)).unwrap_err();
        assert!(matches!(
            err.kind,
            SemaErrorKind::ValueOutOfRange { what: "sprite value", .. }
        ));
    }
}
