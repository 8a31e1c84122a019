#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

//! # strata-auth
//!
//! Authentication and authorization boundary for the Strata distributed
//! data store, decoupled from the query engine that backs credential and
//! permission state.
//!
//! ## What lives here
//!
//! - **SASL PLAIN negotiation**: per-connection [`sasl::SaslNegotiator`]
//!   sessions that decode the single client token into a credential pair
//! - **Credential verification**: [`authenticator::PasswordAuthenticator`]
//!   checks passwords against bcrypt salted hashes fetched through the
//!   abstract [`query::QueryExecutor`] collaborator, with current/legacy
//!   schema compatibility resolved once at setup
//! - **Authorization policy**: the pluggable [`authorizer::Authorizer`]
//!   strategy, shipping with [`authorizer::AllowAllAuthorizer`]
//!
//! The query engine, schema metadata, replicated credential storage and role
//! management are external collaborators reached through the traits in
//! [`query`]; transport encryption and wire framing stay with the caller.
//!
//! ## Flow
//!
//! The connection layer hands each client token to a negotiator created by
//! the active [`authenticator::Authenticator`]; once negotiation completes,
//! [`sasl::SaslNegotiator::authenticated_user`] verifies the decoded pair
//! and yields an [`identity::AuthenticatedUser`]. Authorization is a
//! separate stateless per-call decision evaluated afterwards.
//!
//! ```
//! use std::sync::Arc;
//! use strata_auth::{AuthConfig, AuthenticatorKind};
//! use strata_auth::hash::hash_password;
//! use strata_auth::testing::{FixedSchema, InMemoryExecutor};
//!
//! # fn main() -> strata_auth::Result<()> {
//! let executor = Arc::new(InMemoryExecutor::new());
//! executor.insert_credential("alice", &hash_password("wonderland")?);
//!
//! let config = AuthConfig {
//!     authenticator: AuthenticatorKind::Password,
//!     ..Default::default()
//! };
//! let authenticator =
//!     config.build_authenticator(executor, Arc::new(FixedSchema::new(false)));
//! authenticator.validate_configuration()?;
//! authenticator.setup()?;
//!
//! let mut negotiator = authenticator.new_sasl_negotiator();
//! negotiator.evaluate_response(b"\x00alice\x00wonderland")?;
//! assert_eq!(negotiator.authenticated_user()?.name(), "alice");
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod authorizer;
pub mod config;
pub mod error;
pub mod hash;
pub mod identity;
pub mod permission;
pub mod query;
pub mod resource;
pub mod sasl;
pub mod testing;

pub use authenticator::{AllowAllAuthenticator, Authenticator, PasswordAuthenticator};
pub use authorizer::{AllowAllAuthorizer, Authorizer};
pub use config::{AuthConfig, AuthenticatorKind, AuthorizerKind};
pub use error::{AuthError, Result};
pub use identity::AuthenticatedUser;
pub use permission::{Permission, PermissionDetails};
pub use query::{ConsistencyLevel, PreparedStatement, QueryExecutor, Row, SchemaMetadata};
pub use resource::{DataResource, RoleResource};
pub use sasl::SaslNegotiator;
