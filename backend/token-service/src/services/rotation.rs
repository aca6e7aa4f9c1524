//! Rotation protocol: issue and refresh of access/refresh token pairs
//!
//! A refresh token is single-use. On a successful refresh the matched
//! record is atomically consumed and replaced by a freshly generated pair;
//! a replayed token finds no record and is rejected. Enumeration of a
//! user's records is discovery only - `consume` is the authority, so a
//! concurrent replay that raced past the probe still loses at the delete.

use crate::db::RefreshTokenStore;
use crate::error::{Result, TokenError};
use crate::metrics;
use crate::models::{RefreshTokenRecord, TokenPairResponse};
use crate::security::{hashing, jwt::AccessTokenCodec, secret};
use crate::services::alerts::AnomalyNotifier;
use crate::validators::validate_user_id;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct RotationService {
    store: Arc<dyn RefreshTokenStore>,
    notifier: Arc<dyn AnomalyNotifier>,
    codec: AccessTokenCodec,
    bcrypt_cost: u32,
}

impl RotationService {
    pub fn new(
        store: Arc<dyn RefreshTokenStore>,
        notifier: Arc<dyn AnomalyNotifier>,
        codec: AccessTokenCodec,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            store,
            notifier,
            codec,
            bcrypt_cost,
        }
    }

    /// Issue a fresh access/refresh pair for a user with no prior credential.
    ///
    /// `user_id` is format-checked only; existence against a user directory
    /// is out of scope. A persistence failure aborts the whole operation -
    /// no credential is returned.
    pub async fn issue(&self, user_id: &str, ip: &str) -> Result<TokenPairResponse> {
        if !validate_user_id(user_id) {
            return Err(TokenError::InvalidUserId(user_id.to_string()));
        }
        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| TokenError::InvalidUserId(user_id.to_string()))?;

        let pair = self.mint_pair(user_id, ip).await?;

        metrics::TOKENS_ISSUED.inc();
        tracing::info!(%user_id, ip, "Issued token pair");

        Ok(pair)
    }

    /// Rotate an access/refresh pair presented by a client.
    ///
    /// The access token is verified purely cryptographically; its claims
    /// are trusted only as prior-session context. The refresh token must
    /// match one of the user's live records, which is then atomically
    /// consumed before the replacement pair is persisted.
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
        current_ip: &str,
    ) -> Result<TokenPairResponse> {
        let claims = self.codec.verify(access_token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Unauthorized)?;

        // Linear probe over the user's records: salted hashes cannot be
        // looked up directly, only verified, and per-user record counts
        // are small. At most one record can legitimately match.
        let records = self.store.find_by_user(user_id).await?;
        let Some(matched) = find_matching_record(&records, refresh_token) else {
            metrics::ROTATIONS_REJECTED.inc();
            tracing::warn!(%user_id, current_ip, "Refresh token matched no live record");
            return Err(TokenError::InvalidRefreshToken);
        };

        if current_ip != claims.ip || current_ip != matched.ip_address {
            metrics::IP_ANOMALIES.inc();
            self.dispatch_anomaly_alert(user_id, matched.ip_address.clone(), current_ip);
        }

        // Replay prevention: the atomic delete is the sole serialization
        // point. A concurrent refresh that matched the same record above
        // observes `false` here and is rejected.
        if !self.store.consume(&matched.token_hash).await? {
            metrics::ROTATIONS_REJECTED.inc();
            tracing::warn!(%user_id, "Refresh token already consumed (replay rejected)");
            return Err(TokenError::InvalidRefreshToken);
        }

        // Fail-closed: if persisting the replacement fails after the old
        // record was consumed, the session is lost and the client must
        // re-authenticate.
        let pair = self.mint_pair(user_id, current_ip).await?;

        metrics::TOKENS_ROTATED.inc();
        tracing::info!(%user_id, current_ip, "Rotated token pair");

        Ok(pair)
    }

    /// Generate, hash, and persist a refresh token, then sign the matching
    /// access token. Only the bcrypt hash is stored; the plaintext leaves
    /// the service exactly once, in the returned pair.
    async fn mint_pair(&self, user_id: Uuid, ip: &str) -> Result<TokenPairResponse> {
        let refresh_token = secret::generate_refresh_secret()?;
        let token_hash = hashing::hash_token(&refresh_token, self.bcrypt_cost)?;

        self.store
            .put(&RefreshTokenRecord {
                user_id,
                token_hash,
                ip_address: ip.to_string(),
                created_at: Utc::now(),
            })
            .await?;

        let access_token = self.codec.issue(user_id, ip)?;

        Ok(TokenPairResponse {
            access_token,
            refresh_token,
        })
    }

    /// Fire-and-forget anomaly dispatch; never blocks or fails the rotation.
    fn dispatch_anomaly_alert(&self, user_id: Uuid, old_ip: String, current_ip: &str) {
        let notifier = Arc::clone(&self.notifier);
        let new_ip = current_ip.to_string();

        tokio::spawn(async move {
            notifier.notify(user_id, &old_ip, &new_ip).await;
        });
    }
}

/// First record whose digest verifies against the presented token.
/// Corrupt digests are skipped so one bad row cannot block a user's
/// remaining sessions.
fn find_matching_record<'a>(
    records: &'a [RefreshTokenRecord],
    refresh_token: &str,
) -> Option<&'a RefreshTokenRecord> {
    for record in records {
        match hashing::verify_token(&record.token_hash, refresh_token) {
            Ok(true) => return Some(record),
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!(
                    user_id = %record.user_id,
                    "Skipping corrupt refresh-token digest: {}",
                    e
                );
            }
        }
    }
    None
}
