//! Introspection Module
//!
//! Enumerates a type's named properties and their accessor methods.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::{IntrospectionError, Result};
use crate::model::{Method, TypeIdentity, TypeModel};

/// Property name reserved for the runtime type accessor; never a property.
pub const CLASS_PROPERTY: &str = "class";

// == Property Descriptor ==
/// One introspected property, with accessors exactly as the type exposes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Zero-argument getter returning `property_type`
    pub read: Option<Method>,
    /// One-argument setter taking `property_type`
    pub write: Option<Method>,
    pub property_type: TypeIdentity,
}

// == Introspector ==
/// The introspection capability consumed by property-set construction.
pub trait Introspector: Send + Sync {
    /// Returns the type's properties in a stable order.
    fn introspect(&self, ty: TypeIdentity) -> Result<Vec<PropertyDescriptor>>;
}

// == Bean Introspector ==
/// Derives properties from accessor naming conventions.
///
/// - `getX()` with a non-void return type reads property `x`
/// - `isX()` returning `boolean` reads property `x`, preferred over `getX()`
/// - `setX(T)` with a void return type writes property `x`
///
/// A setter whose parameter type differs from the getter's return type is
/// ignored. Properties are returned ordered by name.
#[derive(Clone)]
pub struct BeanIntrospector {
    model: Arc<dyn TypeModel>,
}

impl BeanIntrospector {
    pub fn new(model: Arc<dyn TypeModel>) -> Self {
        Self { model }
    }

    fn is_boolean(&self, ty: TypeIdentity) -> bool {
        self.model.type_name(ty).as_deref() == Some("boolean")
    }
}

impl Introspector for BeanIntrospector {
    fn introspect(&self, ty: TypeIdentity) -> Result<Vec<PropertyDescriptor>> {
        let methods = self
            .model
            .public_methods(ty)
            .ok_or(IntrospectionError::UnknownType(ty))?;

        let mut getters: BTreeMap<String, Method> = BTreeMap::new();
        let mut setters: BTreeMap<String, Vec<Method>> = BTreeMap::new();

        for method in methods {
            match (method.parameter_types().len(), method.return_type()) {
                (0, Some(returns)) => {
                    if let Some(rest) = accessor_suffix(method.name(), "is") {
                        if self.is_boolean(returns) {
                            getters.insert(decapitalize(rest), method);
                            continue;
                        }
                    }
                    if let Some(rest) = accessor_suffix(method.name(), "get") {
                        getters.entry(decapitalize(rest)).or_insert(method);
                    }
                }
                (1, None) => {
                    if let Some(rest) = accessor_suffix(method.name(), "set") {
                        setters.entry(decapitalize(rest)).or_default().push(method);
                    }
                }
                _ => {}
            }
        }

        let names: BTreeSet<String> = getters.keys().chain(setters.keys()).cloned().collect();
        let mut descriptors = Vec::with_capacity(names.len());

        for name in names {
            if name == CLASS_PROPERTY {
                continue;
            }
            let read = getters.remove(&name);
            let candidates = setters.remove(&name).unwrap_or_default();
            let write = match read.as_ref().and_then(Method::return_type) {
                Some(property_type) => candidates
                    .into_iter()
                    .find(|setter| setter.parameter_types()[0] == property_type),
                None => candidates.into_iter().next(),
            };

            let property_type = match (&read, &write) {
                (Some(read), _) => read.return_type(),
                (None, Some(write)) => write.parameter_types().first().copied(),
                (None, None) => None,
            };
            let Some(property_type) = property_type else {
                continue;
            };

            descriptors.push(PropertyDescriptor {
                name,
                read,
                write,
                property_type,
            });
        }

        Ok(descriptors)
    }
}

/// Strips an accessor prefix, requiring a non-empty remainder.
fn accessor_suffix<'n>(name: &'n str, prefix: &str) -> Option<&'n str> {
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

/// Lowercases the first character unless the first two are both uppercase
/// (`Name` -> `name`, `URL` -> `URL`).
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(first), _) => first
            .to_lowercase()
            .chain(name[first.len_utf8()..].chars())
            .collect(),
        (None, _) => String::new(),
    }
}
