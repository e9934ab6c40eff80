//! Registered compile-time objects.
//!
//! The namespace is append-mostly: names are never overwritten, and every
//! table keeps registration order so output stays deterministic.

use rustc_hash::FxHashMap;

use grf_ir::{Identifier, Name, Span, SpriteLayout, Structure, Value};

/// Resolved members of one container, in definition order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberTable {
    entries: Vec<(Identifier, Value)>,
    index: FxHashMap<Name, usize>,
}

impl MemberTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a member. An existing member of the same name is kept and its
    /// identifier is returned as the error.
    pub fn insert(&mut self, name: Identifier, value: Value) -> Result<(), Identifier> {
        if let Some(&at) = self.index.get(&name.name) {
            return Err(self.entries[at].0);
        }
        self.index.insert(name.name, self.entries.len());
        self.entries.push((name, value));
        Ok(())
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.index.get(&name).map(|&at| &self.entries[at].1)
    }

    /// Where the member called `name` was defined.
    pub fn span_of(&self, name: Name) -> Option<Span> {
        self.index.get(&name).map(|&at| self.entries[at].0.span)
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.index.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Identifier, &Value)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }
}

/// A published structure: its definition and the members its body resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredStructure {
    pub definition: Structure,
    pub members: MemberTable,
}

impl RegisteredStructure {
    #[inline]
    pub fn name(&self) -> Identifier {
        self.definition.id
    }
}

/// The members produced by one `Name::init (...)` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureInstance {
    /// Position of the call, naming the structure it instantiates.
    pub structure: Identifier,
    pub span: Span,
    pub members: MemberTable,
}

/// Everything registration publishes.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    structures: Vec<RegisteredStructure>,
    structure_index: FxHashMap<Name, usize>,
    members: MemberTable,
    layouts: Vec<SpriteLayout>,
    layout_index: FxHashMap<Name, usize>,
    instances: Vec<StructureInstance>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structure(&self, name: Name) -> Option<&RegisteredStructure> {
        self.structure_index
            .get(&name)
            .map(|&at| &self.structures[at])
    }

    #[inline]
    pub fn contains_structure(&self, name: Name) -> bool {
        self.structure_index.contains_key(&name)
    }

    /// Structures in registration order.
    pub fn structures(&self) -> &[RegisteredStructure] {
        &self.structures
    }

    /// Members bound at file level, outside any structure.
    pub fn members(&self) -> &MemberTable {
        &self.members
    }

    pub fn layout(&self, name: Name) -> Option<&SpriteLayout> {
        self.layout_index.get(&name).map(|&at| &self.layouts[at])
    }

    /// Layouts in registration order.
    pub fn layouts(&self) -> &[SpriteLayout] {
        &self.layouts
    }

    /// Structure calls in the order they were made.
    pub fn instances(&self) -> &[StructureInstance] {
        &self.instances
    }

    /// Publish a structure. A name that is already taken is left untouched
    /// and the registered structure is returned as the error.
    pub(crate) fn publish_structure(
        &mut self,
        structure: RegisteredStructure,
    ) -> Result<(), &RegisteredStructure> {
        let name = structure.name().name;
        if let Some(&at) = self.structure_index.get(&name) {
            return Err(&self.structures[at]);
        }
        self.structure_index.insert(name, self.structures.len());
        self.structures.push(structure);
        Ok(())
    }

    pub(crate) fn publish_layout(&mut self, layout: SpriteLayout) -> Result<(), &SpriteLayout> {
        let name = layout.name.name;
        if let Some(&at) = self.layout_index.get(&name) {
            return Err(&self.layouts[at]);
        }
        self.layout_index.insert(name, self.layouts.len());
        self.layouts.push(layout);
        Ok(())
    }

    pub(crate) fn members_mut(&mut self) -> &mut MemberTable {
        &mut self.members
    }

    pub(crate) fn push_instance(&mut self, instance: StructureInstance) {
        self.instances.push(instance);
    }
}
