//! Compilation options.

use rustc_hash::FxHashMap;

use grf_diagnostic::DiagnosticConfig;
use grf_ir::{Feature, FeatureSet, Value};

/// Everything a compilation run is configured with.
///
/// Names are plain strings here; a `Session` interns them when it starts.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Features every layout is generated for.
    pub features: FeatureSet,
    /// Reserved built-in constants, visible everywhere and never shadowed by
    /// members.
    pub builtins: Vec<(String, Value)>,
    /// Variables that only exist while generating for one feature.
    pub feature_variables: FxHashMap<Feature, Vec<(String, Value)>>,
    /// Arguments bound to parameterized layouts, by layout name.
    pub layout_arguments: FxHashMap<String, Vec<Value>>,
    pub diagnostics: DiagnosticConfig,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn with_builtin(mut self, name: impl Into<String>, value: Value) -> Self {
        self.builtins.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn with_feature_variable(
        mut self,
        feature: Feature,
        name: impl Into<String>,
        value: Value,
    ) -> Self {
        self.feature_variables
            .entry(feature)
            .or_default()
            .push((name.into(), value));
        self
    }

    #[must_use]
    pub fn with_layout_arguments(
        mut self,
        layout: impl Into<String>,
        arguments: Vec<Value>,
    ) -> Self {
        self.layout_arguments.insert(layout.into(), arguments);
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, config: DiagnosticConfig) -> Self {
        self.diagnostics = config;
        self
    }
}
