//! Sprite layout parameter checks and per-feature action dispatch.
//!
//! A layout's sprites may use feature variables, so nothing inside a layout
//! is reduced until an `ActionEncoder` is asked for one specific feature.

use rustc_hash::FxHashMap;

use grf_ir::{Feature, FeatureSet, Identifier, Name, SpriteLayout, StringInterner};

use crate::{SemaError, SemaErrorKind, SemaResult};

/// One encoded output record, produced for a single feature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub feature: Feature,
    pub payload: Vec<u8>,
}

/// Turns a layout into action records.
pub trait ActionEncoder {
    /// Whether `layout` produces output at all. Called once, before any
    /// feature is encoded.
    fn prepare_output(&mut self, layout: &SpriteLayout) -> bool;

    /// Encode `layout` for a single feature.
    fn encode_layout(
        &mut self,
        layout: &SpriteLayout,
        feature: Feature,
    ) -> SemaResult<Vec<Action>>;
}

/// Check that every parameter is an identifier and that no name repeats.
///
/// Returns the parameters in declaration order. A repeated name is
/// reported at its second occurrence.
pub fn validate_parameters(
    layout: &SpriteLayout,
    interner: &StringInterner,
) -> SemaResult<Vec<Identifier>> {
    let mut seen: FxHashMap<Name, Identifier> = FxHashMap::default();
    let mut params = Vec::with_capacity(layout.params.len());
    for param in &layout.params {
        let Some(ident) = param.as_identifier() else {
            return Err(SemaError::not_an_identifier("layout parameter", param.span));
        };
        if let Some(first) = seen.insert(ident.name, ident) {
            return Err(SemaError::new(
                SemaErrorKind::DuplicateParameter {
                    name: interner.lookup(ident.name).to_string(),
                    first: first.span,
                },
                ident.span,
            ));
        }
        params.push(ident);
    }
    Ok(params)
}

/// Generate the actions of `layout` for every feature in `features`.
///
/// Features are visited in ascending order and the reserved feature is
/// skipped. A layout the encoder does not prepare produces nothing.
#[tracing::instrument(level = "debug", skip_all, fields(features = features.len()))]
pub fn generate_actions(
    layout: &SpriteLayout,
    features: FeatureSet,
    encoder: &mut dyn ActionEncoder,
) -> SemaResult<Vec<Action>> {
    if !encoder.prepare_output(layout) {
        tracing::debug!("layout not referenced, no actions");
        return Ok(Vec::new());
    }

    let mut actions = Vec::new();
    for feature in features.iter() {
        if feature.is_reserved() {
            continue;
        }
        let encoded = encoder.encode_layout(layout, feature)?;
        tracing::debug!(%feature, actions = encoded.len(), "layout encoded");
        actions.extend(encoded);
    }
    Ok(actions)
}
