use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use log::debug;
use sha2::{Digest, Sha256};

use crate::models::MenuResult;

/// Source of wall-clock time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Hex SHA-256 digest of the raw image bytes.
pub fn content_hash(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: MenuResult,
    timestamp: i64,
}

/// Process-wide result cache with a fixed time-to-live.
///
/// Concurrent misses for the same key may both compute; the last insert wins.
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        ResultCache {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: i64) -> bool {
        now - entry.timestamp < self.ttl.as_millis() as i64
    }

    /// Expired entries are evicted on lookup and reported as misses.
    pub fn get(&self, key: &str) -> Option<MenuResult> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if self.is_fresh(entry, now) => Some(entry.result.clone()),
            Some(_) => {
                debug!("Cache entry {} expired", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, result: MenuResult) {
        let timestamp = self.clock.now_ms();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, CacheEntry { result, timestamp });
    }

    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| now - entry.timestamp < self.ttl.as_millis() as i64);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct ManualClock(AtomicI64);

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn result(confidence: f64) -> MenuResult {
        MenuResult {
            confidence,
            ..MenuResult::default()
        }
    }

    #[test]
    fn test_content_hash_is_hex_sha256() {
        assert_eq!(
            content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let clock = Arc::new(ManualClock(AtomicI64::new(1_000)));
        let cache = ResultCache::with_clock(Duration::from_secs(300), clock.clone());

        cache.insert("k".to_string(), result(0.9));
        clock.0.store(1_000 + 299_999, Ordering::SeqCst);
        assert_eq!(cache.get("k").map(|r| r.confidence), Some(0.9));

        clock.0.store(1_000 + 300_000, Ordering::SeqCst);
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let clock = Arc::new(ManualClock(AtomicI64::new(0)));
        let cache = ResultCache::with_clock(Duration::from_secs(60), clock.clone());
        cache.insert("old".to_string(), result(0.1));
        clock.0.store(30_000, Ordering::SeqCst);
        cache.insert("new".to_string(), result(0.2));
        clock.0.store(61_000, Ordering::SeqCst);

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new").is_some());
    }
}
