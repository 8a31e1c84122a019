//! SASL PLAIN negotiation
//!
//! One negotiation session exists per connection and lives from the first
//! auth message until the attempt succeeds or the connection is torn down.
//! Sessions own no external resources, so tearing a connection down
//! mid-negotiation just drops the session.

use crate::authenticator::PasswordAuthenticator;
use crate::error::{AuthError, Result};
use crate::identity::AuthenticatedUser;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

const NUL: u8 = 0;

/// Per-connection credential-exchange state machine.
pub trait SaslNegotiator: Send {
    /// Process one client-supplied token, returning an outbound challenge
    /// if the mechanism has one.
    fn evaluate_response(&mut self, client_response: &[u8]) -> Result<Option<Vec<u8>>>;

    /// True once a token has been successfully processed.
    fn is_complete(&self) -> bool;

    /// The verified identity. Fails if negotiation is not complete or the
    /// decoded credentials do not verify.
    fn authenticated_user(&self) -> Result<AuthenticatedUser>;
}

/// SASL PLAIN is a single round-trip: the client token carries the
/// credentials and no challenge is ever sent back.
///
/// Token form: `authzId NUL authnId NUL password`, where authzId is optional
/// and ignored (a principal cannot act on behalf of another here). Decoding
/// scans from the end of the token backwards, so an authzId containing
/// arbitrary prefix data, or nothing at all, never shifts the username and
/// password segments.
pub struct PlainTextNegotiator {
    authenticator: Arc<PasswordAuthenticator>,
    complete: bool,
    username: Option<String>,
    password: Option<Zeroizing<String>>,
}

impl PlainTextNegotiator {
    pub fn new(authenticator: Arc<PasswordAuthenticator>) -> Self {
        Self {
            authenticator,
            complete: false,
            username: None,
            password: None,
        }
    }
}

impl SaslNegotiator for PlainTextNegotiator {
    /// A second call after completion re-decodes and overwrites the stored
    /// credentials (last write wins); re-entry is not rejected.
    fn evaluate_response(&mut self, client_response: &[u8]) -> Result<Option<Vec<u8>>> {
        let (username, password) = decode_credentials(client_response)?;
        self.username = Some(username);
        self.password = Some(password);
        self.complete = true;
        Ok(None)
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn authenticated_user(&self) -> Result<AuthenticatedUser> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) if self.complete => {
                self.authenticator.authenticate(username, password)
            }
            _ => Err(AuthError::Authentication(
                "SASL negotiation not complete".to_string(),
            )),
        }
    }
}

/// Decode a SASL PLAIN token into (username, password).
///
/// Scanning runs from the last byte towards the first: the first NUL seen
/// delimits the password, the second delimits the username, and whatever
/// precedes the second (empty or not, NULs included) is the ignored authzId.
fn decode_credentials(token: &[u8]) -> Result<(String, Zeroizing<String>)> {
    debug!("Decoding credentials from client token");

    let mut user: Option<&[u8]> = None;
    let mut pass: Option<&[u8]> = None;
    let mut end = token.len();
    for i in (0..token.len()).rev() {
        if token[i] == NUL {
            if pass.is_none() {
                pass = Some(&token[i + 1..end]);
            } else if user.is_none() {
                user = Some(&token[i + 1..end]);
            }
            end = i;
        }
    }

    let user = user.ok_or_else(|| {
        AuthError::Authentication("Authentication ID must not be null".to_string())
    })?;
    let pass = pass
        .ok_or_else(|| AuthError::Authentication("Password must not be null".to_string()))?;

    Ok((
        String::from_utf8_lossy(user).into_owned(),
        Zeroizing::new(String::from_utf8_lossy(pass).into_owned()),
    ))
}

/// Negotiator used when authentication is not required: the first token
/// completes the exchange and the caller becomes the anonymous principal.
#[derive(Debug, Default)]
pub struct AnonymousNegotiator {
    complete: bool,
}

impl AnonymousNegotiator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaslNegotiator for AnonymousNegotiator {
    fn evaluate_response(&mut self, _client_response: &[u8]) -> Result<Option<Vec<u8>>> {
        self.complete = true;
        Ok(None)
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn authenticated_user(&self) -> Result<AuthenticatedUser> {
        if !self.complete {
            return Err(AuthError::Authentication(
                "SASL negotiation not complete".to_string(),
            ));
        }
        Ok(AuthenticatedUser::anonymous())
    }
}

/// Encode a SASL PLAIN token (client side of the exchange, useful in tests).
#[cfg(test)]
pub(crate) fn encode_credentials(authz_id: &[u8], username: &str, password: &str) -> Vec<u8> {
    let mut token = Vec::new();
    token.extend_from_slice(authz_id);
    token.push(NUL);
    token.extend_from_slice(username.as_bytes());
    token.push(NUL);
    token.extend_from_slice(password.as_bytes());
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash;
    use crate::testing::{FixedSchema, InMemoryExecutor};
    use crate::Authenticator;

    fn negotiator_with_user(username: &str, password: &str) -> Box<dyn SaslNegotiator> {
        let executor = Arc::new(InMemoryExecutor::new());
        executor.insert_credential(username, &hash::hash_password(password).unwrap());
        let auth = Arc::new(PasswordAuthenticator::new(
            executor,
            Arc::new(FixedSchema::new(false)),
        ));
        auth.setup().unwrap();
        auth.new_sasl_negotiator()
    }

    #[test]
    fn test_decode_plain_token() {
        let (user, pass) = decode_credentials(&encode_credentials(b"", "alice", "wonderland")).unwrap();
        assert_eq!(user, "alice");
        assert_eq!(&*pass, "wonderland");
    }

    #[test]
    fn test_decode_ignores_authz_id() {
        let (user, pass) =
            decode_credentials(&encode_credentials(b"impersonator", "alice", "wonderland"))
                .unwrap();
        assert_eq!(user, "alice");
        assert_eq!(&*pass, "wonderland");
    }

    #[test]
    fn test_decode_authz_id_with_embedded_nuls() {
        // A multi-segment authzId must not shift the username/password.
        let (user, pass) =
            decode_credentials(&encode_credentials(b"a\x00b\x00c", "alice", "wonderland"))
                .unwrap();
        assert_eq!(user, "alice");
        assert_eq!(&*pass, "wonderland");
    }

    #[test]
    fn test_decode_empty_username_is_valid_text() {
        // Two NULs with nothing between them: username is the empty string,
        // which is present (distinct from absent).
        let (user, pass) = decode_credentials(b"\x00\x00secret").unwrap();
        assert_eq!(user, "");
        assert_eq!(&*pass, "secret");
    }

    #[test]
    fn test_decode_no_nul_fails_on_username() {
        let err = decode_credentials(b"alicewonderland").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication failed: Authentication ID must not be null"
        );
    }

    #[test]
    fn test_decode_single_nul_has_no_username_segment() {
        // Only the password delimiter: the prefix is never captured as a
        // username, so the token is rejected.
        let err = decode_credentials(b"alice\x00wonderland").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication failed: Authentication ID must not be null"
        );
    }

    #[test]
    fn test_decode_empty_token_fails() {
        let err = decode_credentials(b"").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication failed: Authentication ID must not be null"
        );
    }

    #[test]
    fn test_negotiation_completes_after_one_token() {
        let mut negotiator = negotiator_with_user("alice", "wonderland");
        assert!(!negotiator.is_complete());

        let challenge = negotiator
            .evaluate_response(&encode_credentials(b"", "alice", "wonderland"))
            .unwrap();
        assert!(challenge.is_none());
        assert!(negotiator.is_complete());
    }

    #[test]
    fn test_malformed_token_leaves_negotiation_incomplete() {
        let mut negotiator = negotiator_with_user("alice", "wonderland");

        assert!(negotiator.evaluate_response(b"no-delimiters").is_err());
        assert!(!negotiator.is_complete());
        assert!(negotiator.authenticated_user().is_err());
    }

    #[test]
    fn test_authenticated_user_before_completion_fails() {
        let negotiator = negotiator_with_user("alice", "wonderland");
        let err = negotiator.authenticated_user().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication failed: SASL negotiation not complete"
        );
    }

    #[test]
    fn test_authenticated_user_after_completion() {
        let mut negotiator = negotiator_with_user("alice", "wonderland");
        negotiator
            .evaluate_response(&encode_credentials(b"", "alice", "wonderland"))
            .unwrap();

        let user = negotiator.authenticated_user().unwrap();
        assert_eq!(user.name(), "alice");
    }

    #[test]
    fn test_reevaluation_overwrites_prior_credentials() {
        let mut negotiator = negotiator_with_user("alice", "wonderland");
        negotiator
            .evaluate_response(&encode_credentials(b"", "bob", "builder"))
            .unwrap();
        negotiator
            .evaluate_response(&encode_credentials(b"", "alice", "wonderland"))
            .unwrap();

        // Last write wins.
        let user = negotiator.authenticated_user().unwrap();
        assert_eq!(user.name(), "alice");
    }

    #[test]
    fn test_verification_failure_surfaces_generic_message() {
        let mut negotiator = negotiator_with_user("alice", "wonderland");
        negotiator
            .evaluate_response(&encode_credentials(b"", "alice", "queen-of-hearts"))
            .unwrap();

        let err = negotiator.authenticated_user().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication failed: Username and/or password are incorrect"
        );
    }

    #[test]
    fn test_anonymous_negotiator() {
        let mut negotiator = AnonymousNegotiator::new();
        assert!(!negotiator.is_complete());
        assert!(negotiator.authenticated_user().is_err());

        negotiator.evaluate_response(b"").unwrap();
        assert!(negotiator.is_complete());
        assert!(negotiator.authenticated_user().unwrap().is_anonymous());
    }
}
