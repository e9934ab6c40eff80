//! One compilation run.

use rustc_hash::FxHashMap;

use grf_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use grf_eval::{ScopeLayer, ScopeStack};
use grf_ir::{Feature, Identifier, SpriteLayout, Statement, StringInterner, Value};
use grf_sema::{
    generate_actions, validate_parameters, Action, Namespace, Registrar, SemaError, SemaErrorKind,
    SemaResult,
};

use crate::problem::sema_diagnostic;
use crate::{CompileOptions, LayoutEncoder};

/// What a compilation produced.
#[derive(Debug)]
pub struct CompileOutput {
    /// Actions of every layout, in registration order, then feature order.
    pub actions: Vec<Action>,
    /// Everything registration published, up to the first failure.
    pub namespace: Namespace,
    /// Reported errors and warnings, sorted by position.
    pub diagnostics: Vec<Diagnostic>,
    pub failed: Option<ErrorGuaranteed>,
}

impl CompileOutput {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.failed.is_none()
    }
}

/// Owns the interner and options of a compilation.
///
/// Programs compiled by a session must be built with names from
/// [`Session::interner`]. Every call to [`Session::compile`] starts from
/// fresh scopes and an empty namespace.
pub struct Session {
    interner: StringInterner,
    options: CompileOptions,
}

impl Session {
    pub fn new(options: CompileOptions) -> Self {
        Session {
            interner: StringInterner::new(),
            options,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Register `program`, validate its layouts and generate their actions
    /// for the configured features.
    ///
    /// Registration stops at its first error. Every layout is then checked,
    /// and generated only if all of them passed; each failing layout is
    /// reported, up to the configured error limit. Actions are only returned
    /// from a run without errors.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.len()))]
    pub fn compile(&self, program: &[Statement]) -> CompileOutput {
        let mut scopes = ScopeStack::new(self.builtins());
        let mut registrar = Registrar::new(&self.interner);
        let mut queue = DiagnosticQueue::with_config(self.options.diagnostics.clone());

        let mut actions = match registrar.register_program(program, &mut scopes) {
            Ok(()) => self.generate(registrar.namespace(), scopes, &mut queue),
            Err(err) => {
                report(&mut queue, &err);
                Vec::new()
            }
        };

        let failed = queue.has_errors();
        if failed.is_some() {
            tracing::debug!(errors = queue.error_count(), "compilation failed");
            actions.clear();
        }
        CompileOutput {
            actions,
            namespace: registrar.into_namespace(),
            diagnostics: queue.flush(),
            failed,
        }
    }

    fn generate(
        &self,
        namespace: &Namespace,
        scopes: ScopeStack,
        queue: &mut DiagnosticQueue,
    ) -> Vec<Action> {
        let mut encoder = LayoutEncoder::new(&self.interner, scopes, self.feature_variables());
        self.warn_unmatched_arguments(namespace, queue);

        // Every layout is checked before any is generated.
        for layout in namespace.layouts() {
            if let Err(err) = self.prepare(layout, &mut encoder) {
                report(queue, &err);
            }
        }
        if queue.has_errors().is_some() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        for layout in namespace.layouts() {
            match generate_actions(layout, self.options.features, &mut encoder) {
                Ok(generated) => actions.extend(generated),
                Err(err) => report(queue, &err),
            }
        }
        tracing::debug!(actions = actions.len(), "actions generated");
        actions
    }

    /// Validate a layout's parameters and bind its configured arguments.
    fn prepare(&self, layout: &SpriteLayout, encoder: &mut LayoutEncoder<'_>) -> SemaResult<()> {
        let params = validate_parameters(layout, &self.interner)?;
        let name = self.interner.lookup(layout.name.name);
        if let Some(arguments) = self.options.layout_arguments.get(&*name) {
            let bound = bind_arguments(layout, &name, &params, arguments)?;
            encoder.bind_arguments(layout.name.name, bound);
        }
        Ok(())
    }

    /// Layout arguments naming no registered layout are reported as warnings.
    fn warn_unmatched_arguments(&self, namespace: &Namespace, queue: &mut DiagnosticQueue) {
        let mut unmatched: Vec<&str> = self
            .options
            .layout_arguments
            .keys()
            .map(String::as_str)
            .filter(|name| namespace.layout(self.interner.intern(name)).is_none())
            .collect();
        unmatched.sort_unstable();
        for name in unmatched {
            tracing::debug!(layout = name, "arguments for an unknown layout");
            queue.add(
                Diagnostic::warning(ErrorCode::E2007)
                    .with_message(format!("arguments are configured for unknown layout `{name}`"))
                    .with_note("the arguments are ignored"),
            );
        }
    }

    fn builtins(&self) -> ScopeLayer {
        self.layer(&self.options.builtins)
    }

    fn feature_variables(&self) -> FxHashMap<Feature, ScopeLayer> {
        self.options
            .feature_variables
            .iter()
            .map(|(feature, variables)| (*feature, self.layer(variables)))
            .collect()
    }

    fn layer(&self, bindings: &[(String, Value)]) -> ScopeLayer {
        bindings
            .iter()
            .map(|(name, value)| (self.interner.intern(name), value.clone()))
            .collect()
    }
}

fn report(queue: &mut DiagnosticQueue, err: &SemaError) {
    tracing::debug!(error = %err, "reported");
    queue.emit_error(sema_diagnostic(err));
}

fn bind_arguments(
    layout: &SpriteLayout,
    name: &str,
    params: &[Identifier],
    arguments: &[Value],
) -> SemaResult<ScopeLayer> {
    if params.len() != arguments.len() {
        return Err(SemaError::new(
            SemaErrorKind::ArgumentCount {
                layout: name.to_string(),
                expected: params.len(),
                found: arguments.len(),
            },
            layout.name.span,
        ));
    }
    Ok(params
        .iter()
        .zip(arguments)
        .map(|(param, value)| (param.name, value.clone()))
        .collect())
}
