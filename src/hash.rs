//! One-way password hash checking
//!
//! The reference values stored next to principals are bcrypt salted hashes
//! (salt embedded in the encoding). bcrypt's check recomputes the full hash
//! before comparing, so a mismatch in the leading bytes is no cheaper to
//! detect than one in the trailing bytes.

use crate::error::{AuthError, Result};
use tracing::debug;

/// log2 of the bcrypt work factor used when minting new salted hashes.
pub const GENSALT_LOG2_ROUNDS: u32 = 10;

/// Check a plaintext password against a stored salted hash.
///
/// An unparseable reference value counts as a mismatch: the caller reports
/// the same generic failure either way.
pub fn check_password(plaintext: &str, salted_hash: &str) -> bool {
    match bcrypt::verify(plaintext, salted_hash) {
        Ok(matches) => matches,
        Err(e) => {
            debug!(error = %e, "Malformed salted hash in credential record");
            false
        }
    }
}

/// Mint a new salted hash for a plaintext password.
///
/// The authenticate path never calls this; credential creation and rotation
/// belong to the external role-management collaborator.
pub fn hash_password(plaintext: &str) -> Result<String> {
    bcrypt::hash(plaintext, GENSALT_LOG2_ROUNDS)
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_check_round_trip() {
        let hash = hash_password("wonderland").unwrap();

        assert!(check_password("wonderland", &hash));
        assert!(!check_password("looking-glass", &hash));
    }

    #[test]
    fn test_distinct_salts_per_hash() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();

        assert_ne!(a, b);
        assert!(check_password("secret", &a));
        assert!(check_password("secret", &b));
    }

    #[test]
    fn test_malformed_reference_is_a_mismatch() {
        assert!(!check_password("anything", "not-a-bcrypt-hash"));
        assert!(!check_password("anything", ""));
    }
}
