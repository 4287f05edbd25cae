//! Short-TTL memo of (text, user) → DetectionResult using moka.
//!
//! Keys are blake3 hashes of `text:user`. Entries expire after the
//! configured TTL (default 30 minutes); eviction is lazy, handled by moka
//! on access. Entries are idempotent, so a rare duplicate computation
//! under concurrency is acceptable — no global lock.

use std::time::Duration;

use moka::sync::Cache;

use safespace_core::detection::DetectionResult;

/// In-memory detection result cache.
pub struct DetectionCache {
    cache: Cache<String, DetectionResult>,
}

impl DetectionCache {
    /// Create a cache with the given TTL and capacity.
    pub fn new(ttl_secs: u64, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { cache }
    }

    /// Stable cache key for a (text, user) pair: 16 hex chars of blake3.
    pub fn message_hash(text: &str, user_id: Option<&str>) -> String {
        let content = match user_id {
            Some(user) => format!("{text}:{user}"),
            None => text.to_string(),
        };
        blake3::hash(content.as_bytes()).to_hex()[..16].to_string()
    }

    pub fn get(&self, text_hash: &str) -> Option<DetectionResult> {
        self.cache.get(text_hash)
    }

    pub fn insert(&self, text_hash: String, result: DetectionResult) {
        self.cache.insert(text_hash, result);
    }

    /// Number of live entries (approximate until pending tasks drain).
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safespace_core::detection::ChannelType;

    #[test]
    fn hash_distinguishes_users() {
        let a = DetectionCache::message_hash("hello", Some("u1"));
        let b = DetectionCache::message_hash("hello", Some("u2"));
        let c = DetectionCache::message_hash("hello", None);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn hash_is_stable() {
        assert_eq!(
            DetectionCache::message_hash("hello", Some("u1")),
            DetectionCache::message_hash("hello", Some("u1")),
        );
    }

    #[test]
    fn insert_and_get() {
        let cache = DetectionCache::new(60, 100);
        let hash = DetectionCache::message_hash("hi there", None);
        let result = DetectionResult::empty(hash.clone(), ChannelType::Public);
        cache.insert(hash.clone(), result);
        assert!(cache.get(&hash).is_some());
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        let cache = DetectionCache::new(1, 100);
        let hash = DetectionCache::message_hash("soon forgotten", None);
        let result = DetectionResult::empty(hash.clone(), ChannelType::Public);
        cache.insert(hash.clone(), result);
        assert!(cache.get(&hash).is_some());

        // moka evicts lazily, on the access after the TTL elapses.
        std::thread::sleep(Duration::from_millis(1100));
        assert!(cache.get(&hash).is_none());
    }
}
