//! Refresh-token hashing using bcrypt
//!
//! The digest embeds the work factor and salt, so verification needs no
//! side channel. Hashes cannot be looked up directly, only verified per
//! candidate - the store matches tokens by probing each of a user's
//! digests (see `services::rotation`).

use crate::error::{Result, TokenError};

/// Hash a refresh-token secret with the configured work factor.
pub fn hash_token(plaintext: &str, cost: u32) -> Result<String> {
    bcrypt::hash(plaintext, cost)
        .map_err(|e| TokenError::Internal(format!("Token hashing failed: {}", e)))
}

/// Verify a candidate secret against a stored digest.
///
/// Returns `false` on a clean mismatch. Errors only when the digest itself
/// is malformed; callers scanning multiple records skip such rows.
pub fn verify_token(digest: &str, plaintext: &str) -> Result<bool> {
    bcrypt::verify(plaintext, digest)
        .map_err(|e| TokenError::Internal(format!("Corrupt token digest: {}", e)))
}
