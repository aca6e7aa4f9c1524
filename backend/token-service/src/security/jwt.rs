//! Access-token codec: signed, time-bounded claim sets
//!
//! Verification is purely cryptographic and stateless - it never consults
//! storage. The algorithm is pinned to HS512: a token whose header declares
//! anything else is rejected regardless of its signature, which closes off
//! algorithm-substitution attacks.

use crate::config::JwtSettings;
use crate::error::Result;
use crate::models::AccessClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// The one algorithm this service signs and accepts
const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// HS512 signer/verifier over [`AccessClaims`].
///
/// The signing key is injected at construction and owned by the codec;
/// there is no process-wide key state.
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_seconds: i64,
}

impl AccessTokenCodec {
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            expiry_seconds: settings.expiry_seconds,
        }
    }

    /// Sign an access token for `user_id` bound to the requesting `ip`.
    pub fn issue(&self, user_id: Uuid, ip: &str) -> Result<String> {
        let claims = AccessClaims {
            sub: user_id.to_string(),
            ip: ip.to_string(),
            exp: (Utc::now() + Duration::seconds(self.expiry_seconds)).timestamp(),
        };

        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify signature, algorithm, and expiry; return the embedded claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenError;

    fn test_codec() -> AccessTokenCodec {
        AccessTokenCodec::new(&JwtSettings {
            secret: "unit-test-signing-key".to_string(),
            expiry_seconds: 600,
        })
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id, "10.0.0.1").expect("issue should succeed");
        let claims = codec.verify(&token).expect("verify should succeed");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.ip, "10.0.0.1");

        let remaining = claims.exp - Utc::now().timestamp();
        assert!(remaining > 590 && remaining <= 600);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = test_codec();
        let token = codec.issue(Uuid::new_v4(), "10.0.0.1").unwrap();

        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            codec.verify(&tampered),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let codec = test_codec();
        let other = AccessTokenCodec::new(&JwtSettings {
            secret: "a-different-key".to_string(),
            expiry_seconds: 600,
        });

        let token = other.issue(Uuid::new_v4(), "10.0.0.1").unwrap();
        assert!(matches!(codec.verify(&token), Err(TokenError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = test_codec();

        // Sign claims with an exp already in the past, same key
        let claims = AccessClaims {
            sub: Uuid::new_v4().to_string(),
            ip: "10.0.0.1".to_string(),
            exp: (Utc::now() - Duration::seconds(120)).timestamp(),
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"unit-test-signing-key"),
        )
        .unwrap();

        assert!(matches!(
            codec.verify(&token),
            Err(TokenError::TokenExpired)
        ));
    }

    #[test]
    fn test_algorithm_substitution_rejected() {
        let codec = test_codec();

        // Structurally valid token signed with the same secret but HS256
        let claims = AccessClaims {
            sub: Uuid::new_v4().to_string(),
            ip: "10.0.0.1".to_string(),
            exp: (Utc::now() + Duration::seconds(600)).timestamp(),
        };
        let confused = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-signing-key"),
        )
        .unwrap();

        assert!(matches!(
            codec.verify(&confused),
            Err(TokenError::AlgorithmMismatch)
        ));
    }
}
