//! Layered constant table for compile-time reduction.
//!
//! Uses a stack of layers (not cloning) so a structure body or a loop can
//! shadow outer names without touching them. The bottom layer holds the
//! global constants and is never popped.

use rustc_hash::FxHashMap;
use std::ops::{Deref, DerefMut};

use grf_ir::{Name, Value};

/// One level of the constant table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeLayer {
    bindings: FxHashMap<Name, Value>,
}

impl ScopeLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer holding a single binding.
    pub fn with_binding(name: Name, value: Value) -> Self {
        let mut layer = Self::new();
        layer.define(name, value);
        layer
    }

    /// Bind `name` in this layer, returning the value it replaced.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) -> Option<Value> {
        self.bindings.insert(name, value)
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<&Value> {
        self.bindings.get(&name)
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> {
        self.bindings.iter().map(|(name, value)| (*name, value))
    }
}

impl FromIterator<(Name, Value)> for ScopeLayer {
    fn from_iter<I: IntoIterator<Item = (Name, Value)>>(iter: I) -> Self {
        ScopeLayer {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// Stack of constant layers, innermost last.
///
/// Lookup walks from the most recently pushed layer down to the globals and
/// returns the first match, never skipping a layer.
#[derive(Clone, Debug)]
pub struct ScopeStack {
    layers: Vec<ScopeLayer>,
}

impl ScopeStack {
    /// Create a stack whose bottom layer is `globals`.
    pub fn new(globals: ScopeLayer) -> Self {
        ScopeStack {
            layers: vec![globals],
        }
    }

    /// Number of layers, the globals included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Push `layer` and return a guard that pops it when dropped.
    ///
    /// The guard dereferences to the stack, so reduction and registration
    /// continue through it; any layers pushed through the guard and not yet
    /// popped are removed together with `layer`.
    #[must_use = "the layer is popped as soon as the guard is dropped"]
    pub fn enter(&mut self, layer: ScopeLayer) -> LayerGuard<'_> {
        let depth = self.layers.len();
        self.layers.push(layer);
        LayerGuard { stack: self, depth }
    }

    /// Run `f` with `layer` pushed; the layer is popped however `f` returns.
    pub fn with_layer<R>(&mut self, layer: ScopeLayer, f: impl FnOnce(&mut ScopeStack) -> R) -> R {
        let mut guard = self.enter(layer);
        f(&mut guard)
    }

    /// Look up a name, innermost layer first.
    #[inline]
    pub fn resolve(&self, name: Name) -> Option<&Value> {
        self.layers.iter().rev().find_map(|layer| layer.get(name))
    }

    /// Bind `name` in the innermost layer, returning the value it replaced
    /// in that layer.
    ///
    /// The globals layer is only written by `define_global`. On a stack that
    /// holds nothing but globals, a file layer is pushed first; it stays until
    /// a guard entered below it is dropped.
    pub fn define(&mut self, name: Name, value: Value) -> Option<Value> {
        if self.layers.len() == 1 {
            self.layers.push(ScopeLayer::new());
        }
        self.top_mut().define(name, value)
    }

    /// Whether the innermost layer binds `name`.
    #[inline]
    pub fn top_contains(&self, name: Name) -> bool {
        self.layers.last().is_some_and(|layer| layer.contains(name))
    }

    /// The global (bottom) layer.
    #[inline]
    pub fn globals(&self) -> &ScopeLayer {
        &self.layers[0]
    }

    /// Whether `name` is a global constant.
    #[inline]
    pub fn is_global(&self, name: Name) -> bool {
        self.globals().contains(name)
    }

    /// Bind a global constant. An existing global is never overwritten:
    /// the rejected value is handed back.
    pub fn define_global(&mut self, name: Name, value: Value) -> Result<(), Value> {
        if self.is_global(name) {
            return Err(value);
        }
        self.layers[0].define(name, value);
        Ok(())
    }

    fn top_mut(&mut self) -> &mut ScopeLayer {
        // The globals layer is never popped, so `layers` is never empty.
        let last = self.layers.len().saturating_sub(1);
        &mut self.layers[last]
    }

    fn truncate(&mut self, depth: usize) {
        self.layers.truncate(depth.max(1));
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new(ScopeLayer::new())
    }
}

/// A pushed layer; popped on drop.
pub struct LayerGuard<'a> {
    stack: &'a mut ScopeStack,
    depth: usize,
}

impl LayerGuard<'_> {
    /// The layer this guard pushed.
    pub fn layer(&self) -> &ScopeLayer {
        &self.stack.layers[self.depth]
    }
}

impl Deref for LayerGuard<'_> {
    type Target = ScopeStack;

    #[inline]
    fn deref(&self) -> &ScopeStack {
        self.stack
    }
}

impl DerefMut for LayerGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut ScopeStack {
        self.stack
    }
}

impl Drop for LayerGuard<'_> {
    fn drop(&mut self) {
        self.stack.truncate(self.depth);
    }
}
