//! Authenticated principal identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the default superuser account created when a cluster is first
/// initialized. Credential reads for this account go at a stronger
/// consistency level (see [`crate::query::consistency_for_role`]).
pub const DEFAULT_SUPERUSER_NAME: &str = "strata";

/// Principal used when the active authenticator does not require
/// authentication.
pub const ANONYMOUS_NAME: &str = "anonymous";

/// An authenticated caller.
///
/// Created only on successful verification; immutable; compares by
/// principal name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthenticatedUser {
    name: String,
}

impl AuthenticatedUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The anonymous principal, for deployments that allow unauthenticated
    /// access.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_NAME)
    }

    /// The principal name (called "username" or "role" interchangeably at
    /// the storage boundary).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_NAME
    }
}

impl fmt::Display for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_name() {
        let a = AuthenticatedUser::new("alice");
        let b = AuthenticatedUser::new("alice");
        let c = AuthenticatedUser::new("bob");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_anonymous() {
        let user = AuthenticatedUser::anonymous();
        assert!(user.is_anonymous());
        assert_eq!(user.name(), "anonymous");
        assert!(!AuthenticatedUser::new("alice").is_anonymous());
    }

    #[test]
    fn test_display() {
        assert_eq!(AuthenticatedUser::new("alice").to_string(), "alice");
    }
}
