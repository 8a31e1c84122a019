//! Authenticator implementations
//!
//! [`PasswordAuthenticator`] keeps credentials (role names and bcrypt salted
//! hashes) in the data store itself and verifies them through the
//! statement-execution collaborator. [`AllowAllAuthenticator`] waves every
//! connection through as the anonymous principal.

use crate::error::{AuthError, Result};
use crate::hash;
use crate::identity::AuthenticatedUser;
use crate::query::{consistency_for_role, PreparedStatement, QueryExecutor, SchemaMetadata};
use crate::resource::DataResource;
use crate::sasl::{AnonymousNegotiator, PlainTextNegotiator, SaslNegotiator};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Keyspace holding internal auth state.
pub const AUTH_KEYSPACE: &str = "system_auth";

/// Current-schema credentials table, one row per role, keyed by `role`.
pub const ROLES_TABLE: &str = "roles";

/// Pre-migration credentials table, keyed by `username`. Consulted only
/// while it still exists in schema metadata.
pub const LEGACY_CREDENTIALS_TABLE: &str = "credentials";

/// Column holding the bcrypt salted hash in both schemas.
pub const SALTED_HASH: &str = "salted_hash";

/// Keys expected in the map passed to `legacy_authenticate`.
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";

/// Pluggable authentication strategy, selected once at process
/// configuration time.
pub trait Authenticator: Send + Sync {
    /// Whether clients must authenticate at all. When false, the connection
    /// layer may skip negotiation entirely.
    fn require_authentication(&self) -> bool;

    /// Validate settings before `setup()`. Raised failures are
    /// configuration errors, not authentication failures.
    fn validate_configuration(&self) -> Result<()>;

    /// One-time, single-threaded initialization before any connection is
    /// accepted.
    fn setup(&self) -> Result<()>;

    /// Resources this implementation depends on for its own operation.
    fn protected_resources(&self) -> BTreeSet<DataResource>;

    /// Authenticate from a key-value credential map (older drivers).
    fn legacy_authenticate(
        &self,
        credentials: &HashMap<String, String>,
    ) -> Result<AuthenticatedUser>;

    /// Create a fresh per-connection negotiation session.
    fn new_sasl_negotiator(self: Arc<Self>) -> Box<dyn SaslNegotiator>;
}

/// The credential lookup resolved at setup: one prepared statement plus the
/// schema generation it targets. Never reassigned after `setup()`, so
/// concurrent authentication attempts read it without locking.
#[derive(Debug)]
struct CredentialLookup {
    statement: PreparedStatement,
    legacy: bool,
}

/// Verifies (username, password) pairs against bcrypt salted hashes stored
/// in the `system_auth.roles` table, or in `system_auth.credentials` while a
/// cluster is mid-upgrade and the legacy table still exists.
pub struct PasswordAuthenticator {
    executor: Arc<dyn QueryExecutor>,
    schema: Arc<dyn SchemaMetadata>,
    lookup: OnceLock<CredentialLookup>,
}

impl PasswordAuthenticator {
    pub fn new(executor: Arc<dyn QueryExecutor>, schema: Arc<dyn SchemaMetadata>) -> Self {
        Self {
            executor,
            schema,
            lookup: OnceLock::new(),
        }
    }

    /// Check a (username, password) pair against the stored salted hash.
    ///
    /// No record, a record without a hash, and a hash mismatch all fail with
    /// the same generic message, so the response cannot be used to probe for
    /// valid principals.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthenticatedUser> {
        let lookup = self.lookup.get().ok_or_else(|| {
            AuthError::Config("PasswordAuthenticator used before setup".to_string())
        })?;

        let rows = self
            .executor
            .execute(
                &lookup.statement,
                &[username.to_string()],
                consistency_for_role(username),
            )
            .map_err(|e| {
                debug!(error = %e, "Error performing internal authentication");
                AuthError::Authentication(e.to_string())
            })?;

        match rows.first().and_then(|row| row.get(SALTED_HASH)) {
            Some(salted_hash) if hash::check_password(password, salted_hash) => {
                Ok(AuthenticatedUser::new(username))
            }
            _ => Err(AuthError::bad_credentials()),
        }
    }

    /// Prepare the current-schema lookup and, while the legacy table still
    /// exists, the legacy lookup as well; return the one `authenticate`
    /// will use.
    fn resolve_lookup(&self) -> Result<CredentialLookup> {
        let query = format!(
            "SELECT {} FROM {}.{} WHERE role = ?",
            SALTED_HASH, AUTH_KEYSPACE, ROLES_TABLE
        );
        let current = self.executor.prepare(&query)?;

        // While the legacy table exists the cluster may be running mixed
        // versions that still write credentials there, so it wins until the
        // migration drops it.
        if self
            .schema
            .table_exists(AUTH_KEYSPACE, LEGACY_CREDENTIALS_TABLE)
        {
            debug!(
                table = LEGACY_CREDENTIALS_TABLE,
                "Legacy credentials table present, authenticating against it"
            );
            let query = format!(
                "SELECT {} FROM {}.{} WHERE username = ?",
                SALTED_HASH, AUTH_KEYSPACE, LEGACY_CREDENTIALS_TABLE
            );
            return Ok(CredentialLookup {
                statement: self.executor.prepare(&query)?,
                legacy: true,
            });
        }

        Ok(CredentialLookup {
            statement: current,
            legacy: false,
        })
    }

    /// Whether setup resolved to the legacy-schema lookup.
    pub fn uses_legacy_schema(&self) -> bool {
        self.lookup.get().map(|l| l.legacy).unwrap_or(false)
    }
}

impl Authenticator for PasswordAuthenticator {
    fn require_authentication(&self) -> bool {
        true
    }

    fn validate_configuration(&self) -> Result<()> {
        Ok(())
    }

    fn setup(&self) -> Result<()> {
        let lookup = self.resolve_lookup()?;
        self.lookup
            .set(lookup)
            .map_err(|_| AuthError::Config("PasswordAuthenticator setup called twice".to_string()))
    }

    fn protected_resources(&self) -> BTreeSet<DataResource> {
        // The role manager protects this table as well.
        let mut resources = BTreeSet::new();
        resources.insert(DataResource::table(AUTH_KEYSPACE, ROLES_TABLE));
        resources
    }

    fn legacy_authenticate(
        &self,
        credentials: &HashMap<String, String>,
    ) -> Result<AuthenticatedUser> {
        let username = credentials.get(USERNAME_KEY).ok_or_else(|| {
            AuthError::Authentication(format!("Required key '{}' is missing", USERNAME_KEY))
        })?;
        let password = credentials.get(PASSWORD_KEY).ok_or_else(|| {
            AuthError::Authentication(format!("Required key '{}' is missing", PASSWORD_KEY))
        })?;
        self.authenticate(username, password)
    }

    fn new_sasl_negotiator(self: Arc<Self>) -> Box<dyn SaslNegotiator> {
        Box::new(PlainTextNegotiator::new(self))
    }
}

/// Authenticator that performs no checks: every connection becomes the
/// anonymous principal.
#[derive(Debug, Default)]
pub struct AllowAllAuthenticator;

impl Authenticator for AllowAllAuthenticator {
    fn require_authentication(&self) -> bool {
        false
    }

    fn validate_configuration(&self) -> Result<()> {
        Ok(())
    }

    fn setup(&self) -> Result<()> {
        Ok(())
    }

    fn protected_resources(&self) -> BTreeSet<DataResource> {
        BTreeSet::new()
    }

    fn legacy_authenticate(
        &self,
        _credentials: &HashMap<String, String>,
    ) -> Result<AuthenticatedUser> {
        Ok(AuthenticatedUser::anonymous())
    }

    fn new_sasl_negotiator(self: Arc<Self>) -> Box<dyn SaslNegotiator> {
        Box::new(AnonymousNegotiator::new())
    }
}
