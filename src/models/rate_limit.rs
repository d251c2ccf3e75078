use serde::{Deserialize, Serialize};

/// Fixed-window request counter for one client key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// Number of requests made in the current window
    pub requests: u32,
    /// Unix timestamp when the window resets
    pub reset_at: i64,
}

impl RateLimitRecord {
    /// Create a new rate limit record whose window starts now
    pub fn new(now: i64, window_secs: u64) -> Self {
        Self {
            requests: 0,
            reset_at: now + window_secs as i64,
        }
    }

    /// Count a request if the window still has room
    ///
    /// Returns `Ok(remaining)` when allowed, `Err(retry_after_secs)` when the
    /// limit is already reached.
    pub fn check_and_increment(&mut self, now: i64, max: u32, window_secs: u64) -> Result<u32, u64> {
        // Reset counter if the window has expired
        if now >= self.reset_at {
            self.requests = 0;
            self.reset_at = now + window_secs as i64;
        }

        if self.requests >= max {
            return Err((self.reset_at - now).max(1) as u64);
        }

        self.requests += 1;
        Ok(max - self.requests)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.reset_at
    }
}
