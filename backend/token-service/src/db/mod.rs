/// Database repositories
pub mod refresh_tokens;

pub use refresh_tokens::PgRefreshTokenStore;

use crate::error::Result;
use crate::models::RefreshTokenRecord;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence seam for refresh-token records.
///
/// The store exclusively owns persisted records; the rotation protocol
/// never touches storage except through these operations. `consume` is the
/// single-use enforcement point and must be an atomic conditional delete -
/// enumeration via `find_by_user` is only a discovery mechanism.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert a new record. Multiple records per user may coexist
    /// (multi-device sessions); each is independent.
    async fn put(&self, record: &RefreshTokenRecord) -> Result<()>;

    /// All live records for a user, newest first. Re-queries on each call.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>>;

    /// Delete exactly the record whose hash matches, reporting whether a
    /// row was actually removed. Idempotent: a second call on the same
    /// hash returns `false`. Two concurrent callers can never both see
    /// `true` for the same hash.
    async fn consume(&self, token_hash: &str) -> Result<bool>;

    /// Remove records past their TTL; returns the number deleted.
    async fn purge_expired(&self) -> Result<u64>;
}
