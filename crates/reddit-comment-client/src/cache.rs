//! In-memory response cache
//!
//! Stores serialized fetch responses keyed by request. Entries older than the
//! configured TTL are treated as misses and evicted on access.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::types::{CommentId, PageToken};

/// A cached response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// Serialized response (JSON)
    pub body: String,
    /// When the response was stored
    pub stored_at: DateTime<Utc>,
}

/// Cache usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Response cache shared between fetcher instances
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: HashMap<String, CachedResponse>,
    ttl: Option<Duration>,
    hits: u64,
    misses: u64,
}

impl ResponseCache {
    /// Create a cache whose entries expire after `ttl`
    ///
    /// A TTL too large to represent disables expiry.
    pub fn with_ttl(ttl: std::time::Duration) -> Self {
        Self {
            ttl: Duration::from_std(ttl).ok(),
            ..Self::default()
        }
    }

    /// Cache key for a children page request
    pub fn children_key(id: &CommentId, page: Option<&PageToken>) -> String {
        match page {
            Some(token) => format!("children/{}?after={}", id, token),
            None => format!("children/{}", id),
        }
    }

    /// Cache key for an ancestors request
    pub fn ancestors_key(id: &CommentId) -> String {
        format!("ancestors/{}", id)
    }

    /// Look up a fresh entry, evicting it if it has expired
    pub fn get(&mut self, key: &str) -> Option<&CachedResponse> {
        let expired = match (self.entries.get(key), self.ttl) {
            (Some(entry), Some(ttl)) => Utc::now() - entry.stored_at > ttl,
            (Some(_), None) => false,
            (None, _) => {
                self.misses += 1;
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.misses += 1;
            return None;
        }

        self.hits += 1;
        self.entries.get(key)
    }

    /// Store a response body
    ///
    /// Expired entries are swept first so keys that are never requested
    /// again do not accumulate.
    pub fn set(&mut self, key: impl Into<String>, body: impl Into<String>) {
        self.purge_expired();
        self.entries.insert(
            key.into(),
            CachedResponse {
                body: body.into(),
                stored_at: Utc::now(),
            },
        );
    }

    /// Drop every entry older than the TTL
    ///
    /// Returns the number of removed entries.
    pub fn purge_expired(&mut self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.stored_at <= ttl);
        before - self.entries.len()
    }

    /// Remove every entry whose key starts with `prefix`
    ///
    /// Returns the number of removed entries.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    /// Remove all cached responses for one comment (every children page and its ancestors)
    pub fn invalidate(&mut self, id: &CommentId) -> usize {
        let exact = Self::children_key(id, None);
        let paged = format!("{}?", exact);
        let ancestors = Self::ancestors_key(id);
        let before = self.entries.len();
        self.entries
            .retain(|key, _| *key != exact && !key.starts_with(&paged) && *key != ancestors);
        before - self.entries.len()
    }

    /// Drop every entry (counters are kept)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current usage counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_counts_hits_and_misses() {
        let mut cache = ResponseCache::default();
        assert!(cache.get("children/a").is_none());

        cache.set("children/a", "{}");
        assert_eq!(cache.get("children/a").map(|r| r.body.as_str()), Some("{}"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_expired_entries_are_evicted() {
        let mut cache = ResponseCache::with_ttl(std::time::Duration::from_secs(60));
        cache.set("ancestors/a", "[]");
        cache
            .entries
            .get_mut("ancestors/a")
            .unwrap()
            .stored_at = Utc::now() - Duration::seconds(120);

        assert!(cache.get("ancestors/a").is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_set_sweeps_expired_entries() {
        let mut cache = ResponseCache::with_ttl(std::time::Duration::from_secs(60));
        cache.set("children/old", "{}");
        cache.set("children/fresh", "{}");
        cache.entries.get_mut("children/old").unwrap().stored_at =
            Utc::now() - Duration::seconds(120);

        // Never looked up again, but gone after the next write
        cache.set("children/new", "{}");
        assert_eq!(cache.stats().entries, 2);
        assert!(cache.get("children/fresh").is_some());
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn test_purge_without_ttl_keeps_everything() {
        let mut cache = ResponseCache::default();
        cache.set("children/a", "{}");
        cache.entries.get_mut("children/a").unwrap().stored_at =
            Utc::now() - Duration::days(30);

        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_invalidate_only_touches_one_comment() {
        let mut cache = ResponseCache::default();
        let a = CommentId::from("a");
        let ab = CommentId::from("ab");
        let token = "t1_next".to_string();

        cache.set(ResponseCache::children_key(&a, None), "{}");
        cache.set(ResponseCache::children_key(&a, Some(&token)), "{}");
        cache.set(ResponseCache::ancestors_key(&a), "[]");
        cache.set(ResponseCache::children_key(&ab, None), "{}");

        assert_eq!(cache.invalidate(&a), 3);
        assert_eq!(cache.stats().entries, 1);
        assert!(cache.get(&ResponseCache::children_key(&ab, None)).is_some());
    }

    #[test]
    fn test_invalidate_prefix() {
        let mut cache = ResponseCache::default();
        cache.set("children/a", "{}");
        cache.set("children/b", "{}");
        cache.set("ancestors/a", "[]");

        assert_eq!(cache.invalidate_prefix("children/"), 2);
        assert_eq!(cache.stats().entries, 1);
    }
}
