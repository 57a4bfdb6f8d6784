//! Type Model Module
//!
//! The seam to the host type system: identities, method handles, and the
//! reflective queries the caches need.

mod identity;
mod method;
mod registry;

pub use identity::{ScopeIdentity, TypeIdentity};
pub use method::Method;
pub use registry::{ClassDef, ClassRegistry, MethodDef};

// == Type Model ==
/// Reflective view of the host type system.
///
/// Implementations must keep every supertype chain finite and acyclic;
/// visibility resolution recurses up the hierarchy without a cycle guard.
pub trait TypeModel: Send + Sync {
    /// Human-readable type name, or None if the type is unknown.
    fn type_name(&self, ty: TypeIdentity) -> Option<String>;

    /// Whether the type itself is publicly accessible.
    fn is_public(&self, ty: TypeIdentity) -> bool;

    /// Directly implemented interfaces, in declaration order.
    fn interfaces(&self, ty: TypeIdentity) -> Vec<TypeIdentity>;

    fn superclass(&self, ty: TypeIdentity) -> Option<TypeIdentity>;

    /// Finds a public member method (declared or inherited) with the given
    /// signature. The returned handle names the type that declares it.
    fn find_public_method(
        &self,
        ty: TypeIdentity,
        name: &str,
        parameter_types: &[TypeIdentity],
    ) -> Option<Method>;

    /// All public member methods of the type, most-derived declaration of
    /// each signature first. None if the type is unknown.
    fn public_methods(&self, ty: TypeIdentity) -> Option<Vec<Method>>;
}
