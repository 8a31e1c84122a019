//! The capability set authorization decisions are expressed in

use crate::resource::{DataResource, RoleResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An enumerated capability on a protected resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    Create,
    Alter,
    Drop,
    Select,
    Modify,
    Authorize,
}

impl Permission {
    /// Every permission, in listing order.
    pub const ALL: [Permission; 6] = [
        Permission::Create,
        Permission::Alter,
        Permission::Drop,
        Permission::Select,
        Permission::Modify,
        Permission::Authorize,
    ];

    /// The full permission set.
    pub fn all() -> BTreeSet<Permission> {
        Self::ALL.iter().copied().collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Permission::Create => "CREATE",
            Permission::Alter => "ALTER",
            Permission::Drop => "DROP",
            Permission::Select => "SELECT",
            Permission::Modify => "MODIFY",
            Permission::Authorize => "AUTHORIZE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One granted permission as reported by `Authorizer::list`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PermissionDetails {
    pub grantee: RoleResource,
    pub resource: DataResource,
    pub permission: Permission,
}

impl fmt::Display for PermissionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} granted to {}",
            self.permission, self.resource, self.grantee
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_contains_every_permission() {
        let all = Permission::all();
        assert_eq!(all.len(), Permission::ALL.len());
        for p in Permission::ALL {
            assert!(all.contains(&p));
        }
    }

    #[test]
    fn test_permission_names() {
        assert_eq!(Permission::Select.name(), "SELECT");
        assert_eq!(Permission::Authorize.to_string(), "AUTHORIZE");
    }

    #[test]
    fn test_permission_serde() {
        let json = serde_json::to_string(&Permission::Modify).unwrap();
        assert_eq!(json, "\"MODIFY\"");
        let back: Permission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Permission::Modify);
    }

    #[test]
    fn test_permission_details_display() {
        let details = PermissionDetails {
            grantee: RoleResource::new("ops"),
            resource: DataResource::table("ks", "t"),
            permission: Permission::Select,
        };
        assert_eq!(details.to_string(), "SELECT on data/ks/t granted to roles/ops");
    }
}
