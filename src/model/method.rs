//! Method Handle Module
//!
//! Identifies a method by declaring type, name and parameter types.

use std::sync::Arc;

use crate::model::TypeIdentity;

// == Method ==
/// Handle to a method as declared on a specific type.
///
/// Two handles with the same signature but different declaring types are
/// different methods: callers must invoke through the declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method {
    declaring_type: TypeIdentity,
    name: Arc<str>,
    parameter_types: Arc<[TypeIdentity]>,
    /// None = void
    return_type: Option<TypeIdentity>,
}

impl Method {
    pub fn new(
        declaring_type: TypeIdentity,
        name: impl Into<Arc<str>>,
        parameter_types: impl Into<Arc<[TypeIdentity]>>,
        return_type: Option<TypeIdentity>,
    ) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            parameter_types: parameter_types.into(),
            return_type,
        }
    }

    pub fn declaring_type(&self) -> TypeIdentity {
        self.declaring_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_types(&self) -> &[TypeIdentity] {
        &self.parameter_types
    }

    pub fn return_type(&self) -> Option<TypeIdentity> {
        self.return_type
    }

    /// Returns true if this method has the given name and parameter types.
    pub fn has_signature(&self, name: &str, parameter_types: &[TypeIdentity]) -> bool {
        &*self.name == name && &*self.parameter_types == parameter_types
    }
}
