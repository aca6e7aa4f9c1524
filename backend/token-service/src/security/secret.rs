//! Refresh-token secret generation
//!
//! A refresh token is 32 bytes (256 bits) from the operating system CSPRNG,
//! base64-encoded for transport. At that length the cost of guessing is
//! dominated by the bcrypt comparison on the storage side, not the token
//! length.

use crate::error::{Result, TokenError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Entropy drawn per refresh token, in bytes
pub const REFRESH_SECRET_BYTES: usize = 32;

/// Generate an opaque refresh-token secret.
///
/// Fails only if the OS entropy source is unavailable; callers treat that
/// as an internal, retryable failure.
pub fn generate_refresh_secret() -> Result<String> {
    let mut bytes = [0u8; REFRESH_SECRET_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::Internal(format!("Entropy source unavailable: {}", e)))?;

    Ok(BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_base64_of_32_bytes() {
        let secret = generate_refresh_secret().expect("entropy should be available");
        let decoded = BASE64.decode(&secret).expect("secret should be valid base64");
        assert_eq!(decoded.len(), REFRESH_SECRET_BYTES);
    }

    #[test]
    fn test_secrets_are_distinct() {
        let a = generate_refresh_secret().unwrap();
        let b = generate_refresh_secret().unwrap();
        assert_ne!(a, b);
    }
}
