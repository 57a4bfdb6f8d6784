//! Identity Module
//!
//! Opaque identity tokens for host types and the scopes (modules) that define them.

use std::fmt;

// == Scope Identity ==
/// Opaque handle to a module/loader instance.
///
/// Compared by token only. Two scopes that happen to load identically named
/// types are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeIdentity(u64);

impl ScopeIdentity {
    /// The host's root scope. Never unloaded in practice.
    pub const SYSTEM: ScopeIdentity = ScopeIdentity(0);

    /// Wraps a raw token issued by the host.
    pub const fn from_raw(token: u64) -> Self {
        Self(token)
    }

    /// Returns the raw token.
    pub const fn raw(self) -> u64 {
        self.0
    }

    pub fn is_system(self) -> bool {
        self == Self::SYSTEM
    }
}

impl fmt::Display for ScopeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_system() {
            write!(f, "scope#system")
        } else {
            write!(f, "scope#{}", self.0)
        }
    }
}

// == Type Identity ==
/// Opaque handle to a runtime type, carrying the scope that defined it.
///
/// Equality and hashing use the host-issued token and scope, never the
/// type's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    token: u64,
    scope: ScopeIdentity,
}

impl TypeIdentity {
    pub const fn new(token: u64, scope: ScopeIdentity) -> Self {
        Self { token, scope }
    }

    pub const fn token(self) -> u64 {
        self.token
    }

    /// The defining scope.
    pub const fn scope(self) -> ScopeIdentity {
        self.scope
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}@{}", self.token, self.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_type_identity_compares_by_token_and_scope() {
        let scope_a = ScopeIdentity::from_raw(1);
        let scope_b = ScopeIdentity::from_raw(2);

        let a = TypeIdentity::new(7, scope_a);
        assert_eq!(a, TypeIdentity::new(7, scope_a));
        assert_ne!(a, TypeIdentity::new(7, scope_b));
        assert_ne!(a, TypeIdentity::new(8, scope_a));

        let set: HashSet<_> = [a, TypeIdentity::new(7, scope_a)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display() {
        let ty = TypeIdentity::new(3, ScopeIdentity::from_raw(9));
        assert_eq!(ty.to_string(), "type#3@scope#9");
        assert_eq!(ScopeIdentity::SYSTEM.to_string(), "scope#system");
        assert!(ScopeIdentity::SYSTEM.is_system());
    }
}
