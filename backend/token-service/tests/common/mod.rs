//! Mock store and notifier for rotation-protocol tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use token_service::{
    error::Result, models::RefreshTokenRecord, AnomalyNotifier, RefreshTokenStore,
};
use uuid::Uuid;

/// In-memory refresh-token store.
///
/// All mutations happen under one lock, so `consume` has the same
/// at-most-once semantics as the database's conditional delete: of two
/// concurrent callers presenting the same hash, exactly one sees `true`.
#[derive(Default, Clone)]
pub struct MockRefreshTokenStore {
    records: Arc<Mutex<Vec<RefreshTokenRecord>>>,
}

impl MockRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the rotation protocol
    #[allow(dead_code)]
    pub fn insert_raw(&self, record: RefreshTokenRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn record_count(&self, user_id: Uuid) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl RefreshTokenStore for MockRefreshTokenStore {
    async fn put(&self, record: &RefreshTokenRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>> {
        let mut matching: Vec<RefreshTokenRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn consume(&self, token_hash: &str) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.token_hash != token_hash);
        Ok(records.len() < before)
    }

    async fn purge_expired(&self) -> Result<u64> {
        Ok(0)
    }
}

/// Notifier that records every anomaly call
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<(Uuid, String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(Uuid, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnomalyNotifier for RecordingNotifier {
    async fn notify(&self, user_id: Uuid, old_ip: &str, new_ip: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((user_id, old_ip.to_string(), new_ip.to_string()));
    }
}
