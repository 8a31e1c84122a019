//! Authorization policies
//!
//! An [`Authorizer`] answers "what can this identity do on this resource"
//! and administers grants. The decision is stateless and evaluated per call,
//! after authentication. [`AllowAllAuthorizer`] is the trivial variant:
//! every identity holds every permission and there is nothing to administer.

use crate::error::{AuthError, Result};
use crate::identity::AuthenticatedUser;
use crate::permission::{Permission, PermissionDetails};
use crate::resource::{DataResource, RoleResource};
use std::collections::BTreeSet;

/// Pluggable authorization strategy, selected once at process configuration
/// time. Table-backed implementations hook in here.
pub trait Authorizer: Send + Sync {
    /// The permissions `user` holds on `resource`.
    fn authorize(&self, user: &AuthenticatedUser, resource: &DataResource)
        -> BTreeSet<Permission>;

    /// Grant permissions on a resource to a role.
    fn grant(
        &self,
        performer: &AuthenticatedUser,
        permissions: &BTreeSet<Permission>,
        resource: &DataResource,
        grantee: &RoleResource,
    ) -> Result<()>;

    /// Revoke permissions on a resource from a role.
    fn revoke(
        &self,
        performer: &AuthenticatedUser,
        permissions: &BTreeSet<Permission>,
        resource: &DataResource,
        revokee: &RoleResource,
    ) -> Result<()>;

    /// Cleanup callback when a role is dropped.
    fn revoke_all_from(&self, dropped_role: &RoleResource);

    /// Cleanup callback when a resource is dropped.
    fn revoke_all_on(&self, dropped_resource: &DataResource);

    /// List grants, optionally filtered by resource and/or grantee.
    fn list(
        &self,
        performer: &AuthenticatedUser,
        permissions: &BTreeSet<Permission>,
        resource: Option<&DataResource>,
        of: Option<&RoleResource>,
    ) -> Result<BTreeSet<PermissionDetails>>;

    /// Resources this implementation depends on for its own operation.
    fn protected_resources(&self) -> BTreeSet<DataResource>;

    /// Validate settings before `setup()`.
    fn validate_configuration(&self) -> Result<()>;

    /// One-time initialization before any connection is accepted.
    fn setup(&self) -> Result<()>;
}

/// Policy that authorizes everything and administers nothing.
///
/// GRANT, REVOKE and LIST PERMISSIONS fail loudly rather than pretending to
/// succeed, so an operator who tries to manage permissions under this policy
/// learns immediately that it keeps no permission state.
#[derive(Debug, Default)]
pub struct AllowAllAuthorizer;

impl AllowAllAuthorizer {
    const NAME: &'static str = "AllowAllAuthorizer";

    fn unsupported(operation: &str) -> AuthError {
        AuthError::InvalidRequest(format!(
            "{} operation is not supported by {}",
            operation,
            Self::NAME
        ))
    }
}

impl Authorizer for AllowAllAuthorizer {
    fn authorize(
        &self,
        _user: &AuthenticatedUser,
        _resource: &DataResource,
    ) -> BTreeSet<Permission> {
        Permission::all()
    }

    fn grant(
        &self,
        _performer: &AuthenticatedUser,
        _permissions: &BTreeSet<Permission>,
        _resource: &DataResource,
        _grantee: &RoleResource,
    ) -> Result<()> {
        Err(Self::unsupported("GRANT"))
    }

    fn revoke(
        &self,
        _performer: &AuthenticatedUser,
        _permissions: &BTreeSet<Permission>,
        _resource: &DataResource,
        _revokee: &RoleResource,
    ) -> Result<()> {
        Err(Self::unsupported("REVOKE"))
    }

    fn revoke_all_from(&self, _dropped_role: &RoleResource) {}

    fn revoke_all_on(&self, _dropped_resource: &DataResource) {}

    fn list(
        &self,
        _performer: &AuthenticatedUser,
        _permissions: &BTreeSet<Permission>,
        _resource: Option<&DataResource>,
        _of: Option<&RoleResource>,
    ) -> Result<BTreeSet<PermissionDetails>> {
        Err(Self::unsupported("LIST PERMISSIONS"))
    }

    fn protected_resources(&self) -> BTreeSet<DataResource> {
        BTreeSet::new()
    }

    fn validate_configuration(&self) -> Result<()> {
        Ok(())
    }

    fn setup(&self) -> Result<()> {
        Ok(())
    }
}
