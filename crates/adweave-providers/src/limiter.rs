use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Buckets refill completely once this much time has passed since the last
/// refill. No fractional top-ups.
pub const REFILL_WINDOW: Duration = Duration::from_secs(60);

struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

/// Per-provider token buckets, in-memory only.
///
/// Buckets are created lazily at full capacity and reset to full on process
/// restart. The only state shared across concurrent `invoke` calls — all
/// mutation happens under one lock.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Take one token from the provider's bucket. Returns false when the
    /// bucket is empty — the caller decides whether that is advisory or
    /// blocking.
    pub fn try_acquire(&self, provider_id: &str, capacity: u32) -> bool {
        self.try_acquire_at(provider_id, capacity, Instant::now())
    }

    fn try_acquire_at(&self, provider_id: &str, capacity: u32, now: Instant) -> bool {
        let mut buckets = match self.buckets.lock() {
            Ok(b) => b,
            // A poisoned lock means another caller panicked mid-update;
            // treat the bucket as unavailable rather than propagate.
            Err(_) => return false,
        };

        let bucket = buckets.entry(provider_id.to_string()).or_insert(Bucket {
            tokens: capacity,
            last_refill: now,
        });

        if now.duration_since(bucket.last_refill) >= REFILL_WINDOW {
            bucket.tokens = capacity;
            bucket.last_refill = now;
        }

        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
