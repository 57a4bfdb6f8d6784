//! Error types for the metadata caches
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::model::TypeIdentity;

// == Introspection Error Enum ==
/// Failure to introspect a type.
///
/// Fatal to the single lookup that triggered it. Never cached: the next
/// lookup for the same type introspects again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    /// The host type model does not know the type (never defined, or its
    /// scope has been unloaded)
    #[error("Unknown type: {0}")]
    UnknownType(TypeIdentity),

    /// The host type model reports a structurally invalid type
    #[error("Malformed type {ty}: {reason}")]
    Malformed { ty: TypeIdentity, reason: String },
}

// == Definition Error Enum ==
/// Rejected class definition in a [`ClassRegistry`](crate::model::ClassRegistry).
///
/// Supertypes must be defined before the types that reference them, which
/// keeps every hierarchy finite and acyclic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A referenced supertype is not defined
    #[error("Undefined type referenced: {0}")]
    UndefinedType(TypeIdentity),

    /// A type listed as an implemented interface is a class
    #[error("Not an interface: {0}")]
    NotAnInterface(TypeIdentity),

    /// The superclass is an interface, or an interface declares a superclass
    #[error("Invalid superclass: {0}")]
    InvalidSuperclass(TypeIdentity),
}

// == Result Type Alias ==
/// Convenience Result type for introspection-backed lookups.
pub type Result<T> = std::result::Result<T, IntrospectionError>;
