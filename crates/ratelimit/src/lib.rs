//! Fixed-window rate limiter keyed by IP or bearer token (spec.md §4.8),
//! grounded 1:1 on `original_source/api/rate_limit.go`'s `rateLimiter`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitStrategy {
    Ip,
    Key,
    None,
}

struct Bucket {
    count: u32,
    issued_at: i64,
}

/// Default window lifetime, per spec.md §4.8.
pub const DEFAULT_LIFETIME_SECS: i64 = 60;

pub struct RateLimiter {
    limit: u32,
    lifetime_secs: i64,
    buckets: Mutex<HashMap<String, Bucket>>,
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}

impl RateLimiter {
    pub fn new(limit: u32, lifetime_secs: i64) -> Self {
        Self {
            limit,
            lifetime_secs,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns `(remaining, reset_epoch)`; `remaining == 0` means deny.
    /// Reproduces the original's exact three branches: absent key → create
    /// + allow (without counting this probe); expired window → reset +
    /// allow; else increment-or-deny.
    pub fn check_limit(&self, key: &str) -> (u32, i64) {
        self.check_limit_at(key, now_unix())
    }

    fn check_limit_at(&self, key: &str, now: i64) -> (u32, i64) {
        let mut buckets = self.buckets.lock().expect("rate limiter lock poisoned");

        let Some(bucket) = buckets.get_mut(key) else {
            let issued_at = now;
            buckets.insert(
                key.to_string(),
                Bucket {
                    count: 0,
                    issued_at,
                },
            );
            return (self.limit, issued_at + self.lifetime_secs);
        };

        let reset = bucket.issued_at + self.lifetime_secs;

        if now - bucket.issued_at >= self.lifetime_secs {
            bucket.count = 0;
            bucket.issued_at = now;
            return (self.limit, bucket.issued_at + self.lifetime_secs);
        }

        if bucket.count >= self.limit {
            return (0, reset);
        }

        bucket.count += 1;
        (self.limit - bucket.count, reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_probe_for_a_key_allows_with_full_remaining() {
        let rl = RateLimiter::new(5, DEFAULT_LIFETIME_SECS);
        let (remaining, _) = rl.check_limit_at("a", 1_000);
        assert_eq!(remaining, 5);
    }

    #[test]
    fn allows_at_exactly_limit_then_denies_at_limit_plus_one() {
        let rl = RateLimiter::new(2, DEFAULT_LIFETIME_SECS);
        rl.check_limit_at("a", 1_000); // creates bucket, count=0
        let (r1, _) = rl.check_limit_at("a", 1_000); // count 0->1, remaining 1
        assert_eq!(r1, 1);
        let (r2, _) = rl.check_limit_at("a", 1_000); // count 1->2, remaining 0
        assert_eq!(r2, 0);
        let (r3, _) = rl.check_limit_at("a", 1_000); // count already == limit, deny
        assert_eq!(r3, 0);
    }

    #[test]
    fn expired_window_resets_the_bucket() {
        let rl = RateLimiter::new(1, 60);
        rl.check_limit_at("a", 1_000);
        rl.check_limit_at("a", 1_000); // count now at limit
        let (remaining, _) = rl.check_limit_at("a", 1_000 + 61);
        assert_eq!(remaining, 1);
    }

    #[test]
    fn distinct_keys_have_independent_buckets() {
        let rl = RateLimiter::new(1, DEFAULT_LIFETIME_SECS);
        rl.check_limit_at("a", 1_000);
        let (remaining, _) = rl.check_limit_at("b", 1_000);
        assert_eq!(remaining, 1);
    }
}
