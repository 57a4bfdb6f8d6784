//! Property Set Module
//!
//! Immutable per-type property metadata, with every accessor resolved to a
//! publicly invocable declaration.

use std::collections::HashMap;

use tracing::trace;

use crate::error::Result;
use crate::introspect::{Introspector, PropertyDescriptor};
use crate::model::{Method, TypeIdentity, TypeModel};
use crate::resolve::MethodVisibilityResolver;

// == Accessor Pair ==
/// Read and/or write accessor for one property. At least one is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorPair {
    read: Option<Method>,
    write: Option<Method>,
}

impl AccessorPair {
    /// Returns None when both accessors are absent.
    pub fn new(read: Option<Method>, write: Option<Method>) -> Option<Self> {
        if read.is_none() && write.is_none() {
            return None;
        }
        Some(Self { read, write })
    }

    pub fn read(&self) -> Option<&Method> {
        self.read.as_ref()
    }

    pub fn write(&self) -> Option<&Method> {
        self.write.as_ref()
    }
}

// == Bean Property ==
/// A named property: declared type plus resolved accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanProperty {
    name: String,
    property_type: TypeIdentity,
    accessors: AccessorPair,
}

impl BeanProperty {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> TypeIdentity {
        self.property_type
    }

    pub fn accessors(&self) -> &AccessorPair {
        &self.accessors
    }

    pub fn read_method(&self) -> Option<&Method> {
        self.accessors.read()
    }

    pub fn write_method(&self) -> Option<&Method> {
        self.accessors.write()
    }

    pub fn is_read_only(&self) -> bool {
        self.accessors.write.is_none()
    }
}

// == Property Set ==
/// All properties of one type, keyed by name. Never mutated after build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySet {
    owner: TypeIdentity,
    properties: HashMap<String, BeanProperty>,
}

impl PropertySet {
    // == Build ==
    /// Introspects `ty` and resolves each accessor through the visibility
    /// resolver.
    ///
    /// An accessor with no publicly reachable declaration is dropped; a
    /// property left with neither accessor is omitted. Introspection
    /// failure fails the whole build.
    pub fn build(
        ty: TypeIdentity,
        introspector: &dyn Introspector,
        model: &dyn TypeModel,
    ) -> Result<Self> {
        let resolver = MethodVisibilityResolver::new(model);
        let descriptors = introspector.introspect(ty)?;

        let mut properties = HashMap::with_capacity(descriptors.len());
        for PropertyDescriptor {
            name,
            read,
            write,
            property_type,
        } in descriptors
        {
            let read = resolver.resolve(ty, read.as_ref());
            let write = resolver.resolve(ty, write.as_ref());
            let Some(accessors) = AccessorPair::new(read, write) else {
                trace!(%ty, property = %name, "no publicly reachable accessor");
                continue;
            };
            properties.insert(
                name.clone(),
                BeanProperty {
                    name,
                    property_type,
                    accessors,
                },
            );
        }

        Ok(Self {
            owner: ty,
            properties,
        })
    }

    /// The type these properties were built for.
    pub fn owner(&self) -> TypeIdentity {
        self.owner
    }

    pub fn property(&self, name: &str) -> Option<&BeanProperty> {
        self.properties.get(name)
    }

    pub fn get_accessor(&self, name: &str) -> Option<&AccessorPair> {
        self.properties.get(name).map(BeanProperty::accessors)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntrospectionError;
    use crate::introspect::BeanIntrospector;
    use crate::model::{ClassDef, ClassRegistry, MethodDef, ScopeIdentity};
    use std::sync::Arc;

    struct Fixture {
        registry: Arc<ClassRegistry>,
        scope: ScopeIdentity,
        string: TypeIdentity,
    }

    impl Fixture {
        fn new() -> Self {
            let registry = Arc::new(ClassRegistry::new());
            let scope = registry.new_scope();
            let string = registry
                .define(ClassDef::class("java.lang.String", ScopeIdentity::SYSTEM).public())
                .unwrap();
            Self {
                registry,
                scope,
                string,
            }
        }

        fn build(&self, ty: TypeIdentity) -> Result<PropertySet> {
            let introspector = BeanIntrospector::new(self.registry.clone());
            PropertySet::build(ty, &introspector, self.registry.as_ref())
        }
    }

    #[test]
    fn test_accessor_pair_requires_one_accessor() {
        assert!(AccessorPair::new(None, None).is_none());
    }

    #[test]
    fn test_greeter_read_only_property() {
        let fx = Fixture::new();
        let greeter = fx
            .registry
            .define(
                ClassDef::class("Greeter", fx.scope)
                    .public()
                    .method(MethodDef::new("getName").returns(fx.string)),
            )
            .unwrap();

        let set = fx.build(greeter).unwrap();
        assert_eq!(set.owner(), greeter);
        assert_eq!(set.len(), 1);

        let name = set.get_accessor("name").unwrap();
        assert_eq!(name.read().unwrap().name(), "getName");
        assert!(name.write().is_none());
        assert!(set.property("name").unwrap().is_read_only());
        assert_eq!(set.property("name").unwrap().property_type(), fx.string);

        assert!(set.get_accessor("missing").is_none());
    }

    #[test]
    fn test_accessors_resolved_through_public_interface() {
        let fx = Fixture::new();
        let named = fx
            .registry
            .define(
                ClassDef::interface("Named", fx.scope)
                    .method(MethodDef::new("getName").returns(fx.string)),
            )
            .unwrap();
        let hidden = fx
            .registry
            .define(
                ClassDef::class("HiddenImpl", fx.scope)
                    .implements(named)
                    .method(MethodDef::new("getName").returns(fx.string))
                    .method(MethodDef::new("setName").param(fx.string)),
            )
            .unwrap();

        let set = fx.build(hidden).unwrap();
        let name = set.property("name").unwrap();

        // The getter is callable through the interface; the setter nowhere
        assert_eq!(name.read_method().unwrap().declaring_type(), named);
        assert!(name.write_method().is_none());
        assert!(name.is_read_only());
    }

    #[test]
    fn test_property_without_reachable_accessor_omitted() {
        let fx = Fixture::new();
        let hidden = fx
            .registry
            .define(
                ClassDef::class("Hidden", fx.scope)
                    .method(MethodDef::new("getValue").returns(fx.string)),
            )
            .unwrap();

        let set = fx.build(hidden).unwrap();
        assert!(set.is_empty());
        assert!(set.get_accessor("value").is_none());
    }

    #[test]
    fn test_names_lists_every_property() {
        let fx = Fixture::new();
        let ty = fx
            .registry
            .define(
                ClassDef::class("Pair", fx.scope)
                    .public()
                    .method(MethodDef::new("getLeft").returns(fx.string))
                    .method(MethodDef::new("getRight").returns(fx.string)),
            )
            .unwrap();

        let set = fx.build(ty).unwrap();
        let mut names: Vec<_> = set.names().collect();
        names.sort();
        assert_eq!(names, vec!["left", "right"]);
    }

    #[test]
    fn test_introspection_failure_propagates() {
        let fx = Fixture::new();
        let ghost = TypeIdentity::new(777, fx.scope);

        assert_eq!(
            fx.build(ghost),
            Err(IntrospectionError::UnknownType(ghost))
        );
    }
}
