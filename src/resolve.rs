//! Method Visibility Resolution
//!
//! An accessor found on a type that is not publicly accessible cannot be
//! invoked through that type. The same signature may still be reachable
//! through a public interface or public superclass; this module finds it.

use tracing::trace;

use crate::model::{Method, TypeIdentity, TypeModel};

// == Method Visibility Resolver ==
/// Finds the publicly invocable declaration of a method.
#[derive(Clone, Copy)]
pub struct MethodVisibilityResolver<'a> {
    model: &'a dyn TypeModel,
}

impl<'a> MethodVisibilityResolver<'a> {
    pub fn new(model: &'a dyn TypeModel) -> Self {
        Self { model }
    }

    // == Resolve ==
    /// Returns the declaration of `method` on the nearest publicly
    /// accessible type reachable from `class`, or None if there is none.
    ///
    /// If `class` is public the method is returned unchanged. Otherwise the
    /// directly implemented interfaces are searched in declaration order,
    /// then the superclass; each candidate declaration is resolved again
    /// against its own declaring type and the first success wins.
    pub fn resolve(&self, class: TypeIdentity, method: Option<&Method>) -> Option<Method> {
        let method = method?;

        if self.model.is_public(class) {
            return Some(method.clone());
        }

        for interface in self.model.interfaces(class) {
            if let Some(found) = self.resolve_through(interface, method) {
                return Some(found);
            }
        }

        let superclass = self.model.superclass(class)?;
        self.resolve_through(superclass, method)
    }

    fn resolve_through(&self, ancestor: TypeIdentity, method: &Method) -> Option<Method> {
        let candidate =
            self.model
                .find_public_method(ancestor, method.name(), method.parameter_types())?;
        trace!(
            method = method.name(),
            from = %method.declaring_type(),
            via = %candidate.declaring_type(),
            "trying ancestor declaration"
        );
        self.resolve(candidate.declaring_type(), Some(&candidate))
    }
}
