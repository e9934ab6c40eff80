//! Statement registration.
//!
//! The `Registrar` walks statements in document order and publishes what
//! they define into its `Namespace`. The constant scope is a `ScopeStack`
//! owned by the caller and passed in explicitly: every structure body and
//! every call runs in a layer of its own, popped on the way out whether
//! registration succeeded or not.
//!
//! # Structure lifecycle
//!
//! `Unregistered` -> `Registering` (private layer pushed) -> `Registered`
//! (published, layer discarded). A structure cannot be entered again while
//! it is `Registering`, neither by a call nor by a nested definition of the
//! same name.
//!
//! # Calls
//!
//! `Name::init (...)` first registers its own statements against the call
//! site's scope. The target's initiator and body then run in a further
//! layer: members the call already supplied are skipped, and nested
//! structure and layout definitions are skipped since definitions register
//! once. The members collected along the way become a `StructureInstance`.

use grf_eval::{ensure_sufficient_stack, Reducer, ScopeLayer, ScopeStack};
use grf_ir::{
    ConstDef, Identifier, Member, Name, SpriteLayout, Statement, StringInterner, Structure,
    StructureCall,
};

use crate::namespace::{MemberTable, Namespace, RegisteredStructure, StructureInstance};
use crate::{SemaError, SemaErrorKind, SemaResult};

/// Where a structure is in its registration lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StructureState {
    Unregistered,
    Registering,
    Registered,
}

/// How a statement list is being walked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pass {
    /// First registration of the statements.
    Define,
    /// Re-running a registered structure for a call.
    Instantiate,
}

/// Registers statements into a `Namespace`.
pub struct Registrar<'a> {
    interner: &'a StringInterner,
    namespace: Namespace,
    /// Structures currently registering, outermost first.
    registering: Vec<Identifier>,
    /// Member tables being filled, innermost last. Empty at file level,
    /// where members go to the namespace itself.
    containers: Vec<MemberTable>,
}

impl<'a> Registrar<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Registrar {
            interner,
            namespace: Namespace::new(),
            registering: Vec::new(),
            containers: Vec::new(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn into_namespace(self) -> Namespace {
        self.namespace
    }

    pub fn state_of(&self, name: Name) -> StructureState {
        if self.registering.iter().any(|id| id.name == name) {
            StructureState::Registering
        } else if self.namespace.contains_structure(name) {
            StructureState::Registered
        } else {
            StructureState::Unregistered
        }
    }

    /// Register a whole file. File-level members are bound in a layer above
    /// `scopes`' globals, which is popped again when this returns.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.len()))]
    pub fn register_program(
        &mut self,
        program: &[Statement],
        scopes: &mut ScopeStack,
    ) -> SemaResult<()> {
        let mut file = scopes.enter(ScopeLayer::new());
        self.register_all(program, &mut file, Pass::Define)
    }

    /// Register a single statement in the current scope.
    pub fn register(&mut self, statement: &Statement, scopes: &mut ScopeStack) -> SemaResult<()> {
        self.register_in(statement, scopes, Pass::Define)
    }

    fn register_all(
        &mut self,
        statements: &[Statement],
        scopes: &mut ScopeStack,
        pass: Pass,
    ) -> SemaResult<()> {
        statements
            .iter()
            .try_for_each(|statement| self.register_in(statement, scopes, pass))
    }

    fn register_in(
        &mut self,
        statement: &Statement,
        scopes: &mut ScopeStack,
        pass: Pass,
    ) -> SemaResult<()> {
        ensure_sufficient_stack(|| match (statement, pass) {
            (Statement::Const(def), _) => self.register_const(def, scopes),
            (Statement::Member(member), _) => self.member(member, scopes, pass),
            (Statement::Structure(structure), Pass::Define) => {
                self.register_structure(structure, scopes)
            }
            (Statement::Call(call), _) => self.call(call, scopes),
            (Statement::Layout(layout), Pass::Define) => self.register_layout(layout),
            (Statement::Structure(_) | Statement::Layout(_), Pass::Instantiate) => Ok(()),
        })
    }

    /// `const NAME = value;`
    ///
    /// At file level the constant becomes a global and must not collide
    /// with anything visible. Inside a structure or call it only lives in
    /// the enclosing private layer, where it may shadow outer names but not
    /// the layer's own constants and members.
    pub fn register_const(&mut self, def: &ConstDef, scopes: &mut ScopeStack) -> SemaResult<()> {
        let name = def.name;
        let at_file_level = self.containers.is_empty();
        let bound = if at_file_level {
            scopes.resolve(name.name).is_some()
        } else {
            scopes.top_contains(name.name)
        };
        if bound || self.container().contains(name.name) {
            let previous = self.container().span_of(name.name);
            return Err(SemaError::duplicate_definition(
                "constant",
                &self.interner.lookup(name.name),
                name.span,
                previous,
            ));
        }

        let value = Reducer::fatal(self.interner).reduce_value(&def.value, scopes)?;
        if at_file_level {
            if scopes.define_global(name.name, value).is_err() {
                return Err(SemaError::duplicate_definition(
                    "constant",
                    &self.interner.lookup(name.name),
                    name.span,
                    None,
                ));
            }
        } else {
            scopes.define(name.name, value);
        }
        Ok(())
    }

    /// `name = value;`
    ///
    /// On a stack holding only globals the member is bound in a file layer,
    /// never as a global.
    pub fn register_member(&mut self, member: &Member, scopes: &mut ScopeStack) -> SemaResult<()> {
        self.member(member, scopes, Pass::Define)
    }

    fn member(&mut self, member: &Member, scopes: &mut ScopeStack, pass: Pass) -> SemaResult<()> {
        let Some(name) = member.name.as_identifier() else {
            return Err(SemaError::not_an_identifier("member name", member.span()));
        };
        if scopes.is_global(name.name) {
            return Err(SemaError::new(
                SemaErrorKind::ShadowsGlobalConstant {
                    name: self.interner.lookup(name.name).to_string(),
                },
                name.span,
            ));
        }
        let is_member = self.container().contains(name.name);
        if pass == Pass::Instantiate && is_member {
            return Ok(());
        }
        // Bound in this layer but not a member: a private constant.
        if scopes.top_contains(name.name) && !is_member {
            return Err(SemaError::duplicate_definition(
                "constant",
                &self.interner.lookup(name.name),
                name.span,
                None,
            ));
        }

        let value = Reducer::fatal(self.interner).reduce_value(&member.value, scopes)?;
        if let Err(previous) = self.container().insert(name, value.clone()) {
            return Err(SemaError::duplicate_definition(
                "member",
                &self.interner.lookup(name.name),
                name.span,
                Some(previous.span),
            ));
        }
        let replaced = scopes.define(name.name, value);
        debug_assert!(replaced.is_none(), "member bound twice in one layer");
        Ok(())
    }

    /// Register a structure definition and publish it under its name.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn register_structure(
        &mut self,
        structure: &Structure,
        scopes: &mut ScopeStack,
    ) -> SemaResult<()> {
        let id = structure.id;
        self.check_not_registering(id)?;
        if let Some(previous) = self.namespace.structure(id.name) {
            return Err(SemaError::duplicate_definition(
                "structure",
                &self.interner.lookup(id.name),
                id.span,
                Some(previous.name().span),
            ));
        }

        self.registering.push(id);
        self.containers.push(MemberTable::new());
        let result = self.register_body(structure, scopes);
        let members = self.containers.pop().unwrap_or_default();
        self.registering.pop();
        result?;

        tracing::debug!(
            structure = &*self.interner.lookup(id.name),
            members = members.len(),
            "structure registered"
        );
        let registered = RegisteredStructure {
            definition: structure.clone(),
            members,
        };
        if let Err(previous) = self.namespace.publish_structure(registered) {
            return Err(SemaError::duplicate_definition(
                "structure",
                &self.interner.lookup(id.name),
                id.span,
                Some(previous.name().span),
            ));
        }
        Ok(())
    }

    /// `Name::init (...)`: instantiate a registered structure.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn call(&mut self, call: &StructureCall, scopes: &mut ScopeStack) -> SemaResult<()> {
        let name = call.name;
        self.check_not_registering(name)?;
        let Some(target) = self.namespace.structure(name.name) else {
            return Err(SemaError::new(
                SemaErrorKind::UndefinedStructure {
                    name: self.interner.lookup(name.name).to_string(),
                },
                name.span,
            ));
        };
        let definition = target.definition.clone();

        self.containers.push(MemberTable::new());
        let result = self.instantiate(call, &definition, scopes);
        let members = self.containers.pop().unwrap_or_default();
        result?;

        tracing::debug!(
            structure = &*self.interner.lookup(name.name),
            members = members.len(),
            "structure instantiated"
        );
        self.namespace.push_instance(StructureInstance {
            structure: name,
            span: call.span,
            members,
        });
        Ok(())
    }

    /// Initiator then body, in the structure's private layer.
    fn register_body(&mut self, structure: &Structure, scopes: &mut ScopeStack) -> SemaResult<()> {
        let mut private = scopes.enter(ScopeLayer::new());
        self.register_all(&structure.initiator.statements, &mut private, Pass::Define)?;
        self.register_all(&structure.statements, &mut private, Pass::Define)
    }

    /// The call's own statements in a call-site layer, then the target's
    /// initiator and body in a layer above it.
    fn instantiate(
        &mut self,
        call: &StructureCall,
        target: &Structure,
        scopes: &mut ScopeStack,
    ) -> SemaResult<()> {
        let mut site = scopes.enter(ScopeLayer::new());
        self.register_all(&call.statements, &mut site, Pass::Define)?;

        let mut body = site.enter(ScopeLayer::new());
        self.register_all(&target.initiator.statements, &mut body, Pass::Instantiate)?;
        self.register_all(&target.statements, &mut body, Pass::Instantiate)
    }

    /// Record a layout by name. Its contents stay unreduced until actions are
    /// generated for a feature.
    pub fn register_layout(&mut self, layout: &SpriteLayout) -> SemaResult<()> {
        let name = layout.name;
        if let Err(previous) = self.namespace.publish_layout(layout.clone()) {
            return Err(SemaError::duplicate_definition(
                "layout",
                &self.interner.lookup(name.name),
                name.span,
                Some(previous.name.span),
            ));
        }
        tracing::debug!(layout = &*self.interner.lookup(name.name), "layout registered");
        Ok(())
    }

    fn check_not_registering(&self, id: Identifier) -> SemaResult<()> {
        match self.registering.iter().find(|outer| outer.name == id.name) {
            Some(outer) => Err(SemaError::new(
                SemaErrorKind::RecursiveRegistration {
                    name: self.interner.lookup(id.name).to_string(),
                    outer: outer.span,
                },
                id.span,
            )),
            None => Ok(()),
        }
    }

    fn container(&mut self) -> &mut MemberTable {
        match self.containers.last_mut() {
            Some(table) => table,
            None => self.namespace.members_mut(),
        }
    }
}
