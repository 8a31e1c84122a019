//! Protected resources that authorization decisions are scoped to

use std::fmt;

/// An addressable entity in the data hierarchy: the root, a keyspace, or a
/// table within a keyspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataResource {
    /// The root of the data hierarchy (`data`)
    Root,
    /// A keyspace (`data/<keyspace>`)
    Keyspace(String),
    /// A table (`data/<keyspace>/<table>`)
    Table { keyspace: String, table: String },
}

impl DataResource {
    pub fn root() -> Self {
        DataResource::Root
    }

    pub fn keyspace(name: impl Into<String>) -> Self {
        DataResource::Keyspace(name.into())
    }

    pub fn table(keyspace: impl Into<String>, table: impl Into<String>) -> Self {
        DataResource::Table {
            keyspace: keyspace.into(),
            table: table.into(),
        }
    }

    /// The textual form used in permission listings and error messages.
    pub fn name(&self) -> String {
        match self {
            DataResource::Root => "data".to_string(),
            DataResource::Keyspace(ks) => format!("data/{}", ks),
            DataResource::Table { keyspace, table } => format!("data/{}/{}", keyspace, table),
        }
    }
}

impl fmt::Display for DataResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// An opaque principal grouping used as the grantee/grantor of permissions.
///
/// Lifecycle is managed entirely by the external role-management
/// collaborator; this crate only references roles by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleResource {
    name: String,
}

impl RoleResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RoleResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "roles/{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_resource_names() {
        assert_eq!(DataResource::root().name(), "data");
        assert_eq!(DataResource::keyspace("ks").name(), "data/ks");
        assert_eq!(DataResource::table("ks", "t").name(), "data/ks/t");
    }

    #[test]
    fn test_role_resource_display() {
        assert_eq!(RoleResource::new("ops").to_string(), "roles/ops");
    }

    #[test]
    fn test_resource_equality() {
        assert_eq!(
            DataResource::table("system_auth", "roles"),
            DataResource::table("system_auth", "roles")
        );
        assert_ne!(DataResource::keyspace("a"), DataResource::keyspace("b"));
    }
}
