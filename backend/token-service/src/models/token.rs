/// Token data models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims carried by a signed access token.
///
/// Immutable once signed; access tokens are never revoked server-side and
/// simply age out at `exp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id as GUID string)
    pub sub: String,
    /// Client IP address at issuance
    pub ip: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// One currently-valid, unused refresh token.
///
/// Only the bcrypt hash of the token is persisted; the plaintext is
/// returned to the client exactly once. A row is deleted exactly once:
/// consumed during a successful rotation, or purged after its TTL.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub token_hash: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

/// Refresh request body: the access/refresh pair being rotated
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshTokensRequest {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issued credential pair
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}
