//! In-memory stand-ins for the external collaborators
//!
//! These back the crate's own tests and give embedders a reference fixture
//! for wiring up an [`crate::authenticator::Authenticator`] without a
//! running query engine.

// A poisoned fixture lock means a test thread already panicked while
// holding it; panicking again here is the only sensible outcome.
#![allow(clippy::expect_used)]

use crate::authenticator::SALTED_HASH;
use crate::error::{AuthError, Result};
use crate::query::{ConsistencyLevel, PreparedStatement, QueryExecutor, Row, SchemaMetadata};
use std::collections::HashMap;
use std::sync::Mutex;

/// Statement executor over an in-memory credential map, keyed by principal
/// name. Records every prepared query and every executed consistency level
/// so tests can assert on the interaction.
#[derive(Debug, Default)]
pub struct InMemoryExecutor {
    rows: Mutex<HashMap<String, Row>>,
    prepared: Mutex<Vec<String>>,
    executed: Mutex<Vec<ConsistencyLevel>>,
    execution_failure: Mutex<Option<String>>,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential record with the given salted hash.
    pub fn insert_credential(&self, principal: &str, salted_hash: &str) {
        self.insert_row(
            principal,
            Row::new().with_column(SALTED_HASH, salted_hash),
        );
    }

    /// Store an arbitrary row for a principal (e.g. one missing the hash
    /// column).
    pub fn insert_row(&self, principal: &str, row: Row) {
        self.rows
            .lock()
            .expect("rows lock poisoned")
            .insert(principal.to_string(), row);
    }

    /// Make every subsequent `execute` fail with the given message.
    pub fn fail_executions(&self, message: &str) {
        *self
            .execution_failure
            .lock()
            .expect("failure lock poisoned") = Some(message.to_string());
    }

    /// Queries passed to `prepare`, in order.
    pub fn prepared_queries(&self) -> Vec<String> {
        self.prepared.lock().expect("prepared lock poisoned").clone()
    }

    /// Consistency levels of every `execute` call, in order.
    pub fn executed_consistency_levels(&self) -> Vec<ConsistencyLevel> {
        self.executed.lock().expect("executed lock poisoned").clone()
    }
}

impl QueryExecutor for InMemoryExecutor {
    fn prepare(&self, query: &str) -> Result<PreparedStatement> {
        self.prepared
            .lock()
            .expect("prepared lock poisoned")
            .push(query.to_string());
        Ok(PreparedStatement::new(query))
    }

    fn execute(
        &self,
        _statement: &PreparedStatement,
        values: &[String],
        consistency: ConsistencyLevel,
    ) -> Result<Vec<Row>> {
        if let Some(message) = self
            .execution_failure
            .lock()
            .expect("failure lock poisoned")
            .clone()
        {
            return Err(AuthError::Execution(message));
        }

        self.executed
            .lock()
            .expect("executed lock poisoned")
            .push(consistency);

        let principal = match values.first() {
            Some(p) => p,
            None => return Ok(Vec::new()),
        };
        Ok(self
            .rows
            .lock()
            .expect("rows lock poisoned")
            .get(principal)
            .cloned()
            .into_iter()
            .collect())
    }
}

/// Schema metadata with a fixed answer for the legacy credentials table.
#[derive(Debug)]
pub struct FixedSchema {
    legacy_table_exists: bool,
}

impl FixedSchema {
    pub fn new(legacy_table_exists: bool) -> Self {
        Self {
            legacy_table_exists,
        }
    }
}

impl SchemaMetadata for FixedSchema {
    fn table_exists(&self, keyspace: &str, table: &str) -> bool {
        keyspace == crate::authenticator::AUTH_KEYSPACE
            && table == crate::authenticator::LEGACY_CREDENTIALS_TABLE
            && self.legacy_table_exists
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_returns_stored_row() {
        let executor = InMemoryExecutor::new();
        executor.insert_credential("alice", "$2b$10$hash");

        let stmt = executor.prepare("SELECT salted_hash FROM x WHERE role = ?").unwrap();
        let rows = executor
            .execute(&stmt, &["alice".to_string()], ConsistencyLevel::LocalOne)
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(SALTED_HASH), Some("$2b$10$hash"));

        let rows = executor
            .execute(&stmt, &["bob".to_string()], ConsistencyLevel::LocalOne)
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_executor_injected_failure() {
        let executor = InMemoryExecutor::new();
        executor.fail_executions("connection reset");

        let stmt = executor.prepare("SELECT 1").unwrap();
        let err = executor
            .execute(&stmt, &["alice".to_string()], ConsistencyLevel::LocalOne)
            .unwrap_err();
        assert_eq!(err.to_string(), "Execution error: connection reset");
    }

    #[test]
    fn test_fixed_schema_only_answers_for_legacy_table() {
        let schema = FixedSchema::new(true);
        assert!(schema.table_exists("system_auth", "credentials"));
        assert!(!schema.table_exists("system_auth", "roles"));
        assert!(!schema.table_exists("other", "credentials"));

        let schema = FixedSchema::new(false);
        assert!(!schema.table_exists("system_auth", "credentials"));
    }
}
