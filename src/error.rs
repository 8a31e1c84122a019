//! Error types for the auth boundary
//!
//! Every failure here is scoped to a single connection's negotiation or a
//! single authorization decision; nothing is retried internally and nothing
//! is fatal to the process.

use thiserror::Error;

/// Result type alias for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Main error type for the auth boundary
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed or incomplete client token, unknown principal, or hash
    /// mismatch. Credential mismatches always carry the same generic message
    /// so callers cannot enumerate valid principals.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// An operation the active implementation deliberately does not support
    /// (e.g. GRANT under an allow-all policy).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Validation or setup failure for implementations that require schema
    /// or settings, or use of a component before its `setup()` phase.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the external statement-execution collaborator.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Unexpected internal failure (e.g. the hashing backend rejecting its
    /// own parameters).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Shorthand for the generic credential-mismatch failure.
    ///
    /// Deliberately does not distinguish "unknown principal" from "wrong
    /// password".
    pub fn bad_credentials() -> Self {
        AuthError::Authentication("Username and/or password are incorrect".to_string())
    }
}
