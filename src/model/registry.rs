//! Class Registry Module
//!
//! In-memory implementation of the host type model. Hosts populate it as
//! modules load and drop a scope's types when the module unloads.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::DefinitionError;
use crate::model::{Method, ScopeIdentity, TypeIdentity, TypeModel};

// == Method Definition ==
/// A method declared on a [`ClassDef`]. Public unless marked otherwise.
#[derive(Debug, Clone)]
pub struct MethodDef {
    name: String,
    parameter_types: Vec<TypeIdentity>,
    return_type: Option<TypeIdentity>,
    public: bool,
}

impl MethodDef {
    /// A public, void, zero-argument method.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_types: Vec::new(),
            return_type: None,
            public: true,
        }
    }

    pub fn param(mut self, ty: TypeIdentity) -> Self {
        self.parameter_types.push(ty);
        self
    }

    pub fn returns(mut self, ty: TypeIdentity) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Marks the method as not publicly accessible.
    pub fn non_public(mut self) -> Self {
        self.public = false;
        self
    }

    fn handle(&self, declaring_type: TypeIdentity) -> Method {
        Method::new(
            declaring_type,
            self.name.as_str(),
            self.parameter_types.clone(),
            self.return_type,
        )
    }

    fn has_signature(&self, name: &str, parameter_types: &[TypeIdentity]) -> bool {
        self.name == name && self.parameter_types == parameter_types
    }
}

// == Class Definition ==
/// Description of a class or interface to register.
///
/// Classes start out package-private; interfaces start out public.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    scope: ScopeIdentity,
    interface: bool,
    public: bool,
    superclass: Option<TypeIdentity>,
    interfaces: Vec<TypeIdentity>,
    methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn class(name: impl Into<String>, scope: ScopeIdentity) -> Self {
        Self {
            name: name.into(),
            scope,
            interface: false,
            public: false,
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>, scope: ScopeIdentity) -> Self {
        Self {
            interface: true,
            public: true,
            ..Self::class(name, scope)
        }
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn non_public(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn extends(mut self, superclass: TypeIdentity) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Adds a directly implemented (or, for interfaces, extended) interface.
    /// Declaration order is preserved.
    pub fn implements(mut self, interface: TypeIdentity) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }
}

// == Class Registry ==
/// Thread-safe in-memory type model.
#[derive(Debug)]
pub struct ClassRegistry {
    classes: DashMap<TypeIdentity, Arc<ClassDef>>,
    next_token: AtomicU64,
    next_scope: AtomicU64,
}

impl ClassRegistry {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            classes: DashMap::new(),
            next_token: AtomicU64::new(1),
            next_scope: AtomicU64::new(1),
        }
    }

    // == New Scope ==
    /// Issues a fresh scope identity, distinct from every other scope.
    pub fn new_scope(&self) -> ScopeIdentity {
        ScopeIdentity::from_raw(self.next_scope.fetch_add(1, Ordering::Relaxed))
    }

    // == Define ==
    /// Registers a type and returns its identity.
    ///
    /// Every supertype must already be registered, so no definition can
    /// close a cycle.
    pub fn define(&self, def: ClassDef) -> Result<TypeIdentity, DefinitionError> {
        if let Some(superclass) = def.superclass {
            let parent = self
                .lookup(superclass)
                .ok_or(DefinitionError::UndefinedType(superclass))?;
            if def.interface || parent.interface {
                return Err(DefinitionError::InvalidSuperclass(superclass));
            }
        }
        for &interface in &def.interfaces {
            let parent = self
                .lookup(interface)
                .ok_or(DefinitionError::UndefinedType(interface))?;
            if !parent.interface {
                return Err(DefinitionError::NotAnInterface(interface));
            }
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let ty = TypeIdentity::new(token, def.scope);
        debug!(%ty, name = %def.name, "type defined");
        self.classes.insert(ty, Arc::new(def));
        Ok(ty)
    }

    // == Unload Scope ==
    /// Forgets every type defined by the scope. Returns how many were removed.
    pub fn unload_scope(&self, scope: ScopeIdentity) -> usize {
        let before = self.classes.len();
        self.classes.retain(|ty, _| ty.scope() != scope);
        before.saturating_sub(self.classes.len())
    }

    pub fn contains(&self, ty: TypeIdentity) -> bool {
        self.classes.contains_key(&ty)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Clones the definition out so no map guard is held while recursing.
    fn lookup(&self, ty: TypeIdentity) -> Option<Arc<ClassDef>> {
        self.classes.get(&ty).map(|def| Arc::clone(def.value()))
    }

    fn collect_public_methods(
        &self,
        ty: TypeIdentity,
        seen: &mut HashSet<(String, Vec<TypeIdentity>)>,
        out: &mut Vec<Method>,
    ) {
        let Some(def) = self.lookup(ty) else {
            return;
        };
        for method in def.methods.iter().filter(|m| m.public) {
            if seen.insert((method.name.clone(), method.parameter_types.clone())) {
                out.push(method.handle(ty));
            }
        }
        if let Some(superclass) = def.superclass {
            self.collect_public_methods(superclass, seen, out);
        }
        for &interface in &def.interfaces {
            self.collect_public_methods(interface, seen, out);
        }
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeModel for ClassRegistry {
    fn type_name(&self, ty: TypeIdentity) -> Option<String> {
        self.lookup(ty).map(|def| def.name.clone())
    }

    fn is_public(&self, ty: TypeIdentity) -> bool {
        self.lookup(ty).is_some_and(|def| def.public)
    }

    fn interfaces(&self, ty: TypeIdentity) -> Vec<TypeIdentity> {
        self.lookup(ty)
            .map(|def| def.interfaces.clone())
            .unwrap_or_default()
    }

    fn superclass(&self, ty: TypeIdentity) -> Option<TypeIdentity> {
        self.lookup(ty).and_then(|def| def.superclass)
    }

    fn find_public_method(
        &self,
        ty: TypeIdentity,
        name: &str,
        parameter_types: &[TypeIdentity],
    ) -> Option<Method> {
        let def = self.lookup(ty)?;
        if let Some(method) = def
            .methods
            .iter()
            .find(|m| m.public && m.has_signature(name, parameter_types))
        {
            return Some(method.handle(ty));
        }
        if let Some(found) = def
            .superclass
            .and_then(|superclass| self.find_public_method(superclass, name, parameter_types))
        {
            return Some(found);
        }
        def.interfaces
            .iter()
            .find_map(|&interface| self.find_public_method(interface, name, parameter_types))
    }

    fn public_methods(&self, ty: TypeIdentity) -> Option<Vec<Method>> {
        if !self.contains(ty) {
            return None;
        }
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_public_methods(ty, &mut seen, &mut out);
        Some(out)
    }
}
