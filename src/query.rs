//! Seams to the external statement-execution and schema-metadata collaborators
//!
//! The auth boundary never talks to storage directly: credential lookups go
//! through a [`QueryExecutor`] prepared once at setup and executed once per
//! authentication attempt, and the legacy-schema decision is taken once
//! against [`SchemaMetadata`]. Both collaborators must be safe for concurrent
//! invocation from many connections; execution is synchronous from this
//! crate's perspective and carries no additional timeout of its own.

use crate::error::Result;
use crate::identity::DEFAULT_SUPERUSER_NAME;
use std::collections::HashMap;

/// Consistency level requested for internal system reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyLevel {
    One,
    LocalOne,
    Quorum,
    LocalQuorum,
}

/// Consistency used when reading a role's credential record.
///
/// The default superuser is read at QUORUM so that a freshly initialized
/// cluster agrees on the bootstrap account before any weaker-consistency
/// read could miss it; everyone else is read at LOCAL_ONE.
pub fn consistency_for_role(role: &str) -> ConsistencyLevel {
    if role == DEFAULT_SUPERUSER_NAME {
        ConsistencyLevel::Quorum
    } else {
        ConsistencyLevel::LocalOne
    }
}

/// Handle to a statement prepared by the execution collaborator.
///
/// Prepared during the single-threaded `setup()` phase and read concurrently
/// afterwards; never reassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStatement {
    query: String,
}

impl PreparedStatement {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// A single result row of named text columns.
///
/// A column may be absent from a row even when the query selected it; callers
/// must treat "row present, column absent" the same as "no value".
#[derive(Debug, Clone, Default)]
pub struct Row {
    columns: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    pub fn has(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }
}

/// The external statement-execution collaborator.
pub trait QueryExecutor: Send + Sync {
    /// Prepare a query for repeated execution. Called during `setup()` only.
    fn prepare(&self, query: &str) -> Result<PreparedStatement>;

    /// Execute a prepared statement with bound values at the given
    /// consistency. Called once per authentication attempt.
    fn execute(
        &self,
        statement: &PreparedStatement,
        values: &[String],
        consistency: ConsistencyLevel,
    ) -> Result<Vec<Row>>;
}

/// The external schema-metadata collaborator.
pub trait SchemaMetadata: Send + Sync {
    /// Whether a table exists; consulted once at setup to decide if the
    /// legacy lookup path is prepared at all.
    fn table_exists(&self, keyspace: &str, table: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_for_role() {
        assert_eq!(
            consistency_for_role(DEFAULT_SUPERUSER_NAME),
            ConsistencyLevel::Quorum
        );
        assert_eq!(consistency_for_role("alice"), ConsistencyLevel::LocalOne);
    }

    #[test]
    fn test_row_columns() {
        let row = Row::new().with_column("salted_hash", "$2b$10$abc");

        assert!(row.has("salted_hash"));
        assert_eq!(row.get("salted_hash"), Some("$2b$10$abc"));
        assert!(!row.has("options"));
        assert_eq!(row.get("options"), None);
    }

    #[test]
    fn test_prepared_statement_keeps_query_text() {
        let stmt = PreparedStatement::new("SELECT x FROM ks.t WHERE id = ?");
        assert_eq!(stmt.query(), "SELECT x FROM ks.t WHERE id = ?");
    }
}
