use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::models::RateLimitRecord;

/// Counter store behind the `/api` rate limiter
///
/// Kept behind a trait so a shared cache can replace the in-process map
/// without touching the middleware.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `key`
    ///
    /// Returns `Ok(remaining)` if admitted, `Err(retry_after_secs)` if not.
    async fn hit(&self, key: &str, now: i64, max: u32, window_secs: u64) -> Result<u32, u64>;

    /// Drop counters whose window has ended
    async fn prune(&self, now: i64);
}

/// Per-process rate limit counters
#[derive(Default)]
pub struct InMemoryRateLimitStore {
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(&self, key: &str, now: i64, max: u32, window_secs: u64) -> Result<u32, u64> {
        let mut records = self.records.lock().await;
        let record = records
            .entry(key.to_string())
            .or_insert_with(|| RateLimitRecord::new(now, window_secs));

        let result = record.check_and_increment(now, max, window_secs);
        if result.is_err() {
            tracing::warn!("Rate limit exceeded for {}: {}/{}", key, record.requests, max);
        }
        result
    }

    async fn prune(&self, now: i64) {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));

        let removed = before - records.len();
        if removed > 0 {
            tracing::debug!("Pruned {} expired rate limit records", removed);
        }
    }
}
