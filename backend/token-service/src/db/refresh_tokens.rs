/// Refresh-token store backed by PostgreSQL
use crate::db::RefreshTokenStore;
use crate::error::Result;
use crate::models::RefreshTokenRecord;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
    ttl: Duration,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool, ttl_days: i64) -> Self {
        Self {
            pool,
            ttl: Duration::days(ttl_days),
        }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn put(&self, record: &RefreshTokenRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, ip_address, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.user_id)
        .bind(&record.token_hash)
        .bind(&record.ip_address)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>> {
        let cutoff = Utc::now() - self.ttl;

        let records = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            SELECT user_id, token_hash, ip_address, created_at
            FROM refresh_tokens
            WHERE user_id = $1 AND created_at > $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn consume(&self, token_hash: &str) -> Result<bool> {
        // Single atomic conditional delete: the database serializes
        // concurrent callers, so at most one observes rows_affected == 1.
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self) -> Result<u64> {
        let cutoff = Utc::now() - self.ttl;

        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens WHERE created_at <= $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
