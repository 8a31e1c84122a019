//! Selection of the active authenticator and authorizer implementations
//!
//! The surrounding process owns where this configuration comes from; this
//! module only maps the selected kinds to constructed implementations.

use crate::authenticator::{AllowAllAuthenticator, Authenticator, PasswordAuthenticator};
use crate::authorizer::{AllowAllAuthorizer, Authorizer};
use crate::query::{QueryExecutor, SchemaMetadata};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which authenticator implementation is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticatorKind {
    /// No authentication; every connection is anonymous.
    #[default]
    AllowAll,
    /// Password verification against credentials stored in the data store.
    Password,
}

/// Which authorizer implementation is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizerKind {
    /// Every identity holds every permission.
    #[default]
    AllowAll,
}

/// Auth configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub authenticator: AuthenticatorKind,
    #[serde(default)]
    pub authorizer: AuthorizerKind,
}

impl AuthConfig {
    /// Construct the configured authenticator. The collaborators are only
    /// used by the password implementation; the allow-all variant ignores
    /// them.
    pub fn build_authenticator(
        &self,
        executor: Arc<dyn QueryExecutor>,
        schema: Arc<dyn SchemaMetadata>,
    ) -> Arc<dyn Authenticator> {
        match self.authenticator {
            AuthenticatorKind::AllowAll => Arc::new(AllowAllAuthenticator),
            AuthenticatorKind::Password => {
                Arc::new(PasswordAuthenticator::new(executor, schema))
            }
        }
    }

    /// Construct the configured authorizer.
    pub fn build_authorizer(&self) -> Arc<dyn Authorizer> {
        match self.authorizer {
            AuthorizerKind::AllowAll => Arc::new(AllowAllAuthorizer),
        }
    }
}
