//! Cached comment fetcher (decorator pattern)
//!
//! Wraps any `CommentFetcher` implementation to add caching behavior.
//! The cache mode determines whether to read from cache, write to cache, or both.

use crate::cache::ResponseCache;
use crate::fetcher::{CacheMode, CommentFetcher};
use crate::types::{ChildrenPage, CommentId, PageToken, RedditCommentData};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cached comment fetcher using the decorator pattern
///
/// Wraps an inner `CommentFetcher` and adds caching behavior based on the
/// configured `CacheMode`, without the caller needing to be aware of the cache.
///
/// # Example
///
/// ```rust,ignore
/// use reddit_comment_client::{CachedCommentFetcher, CacheMode, ResponseCache};
/// use std::sync::{Arc, Mutex};
///
/// let cache = Arc::new(Mutex::new(ResponseCache::default()));
/// let fetcher = CachedCommentFetcher::new(inner, cache, CacheMode::ReadWrite);
/// ```
#[derive(Debug, Clone)]
pub struct CachedCommentFetcher<F: CommentFetcher + Clone> {
    inner: F,
    cache: Arc<Mutex<ResponseCache>>,
    mode: CacheMode,
}

impl<F: CommentFetcher + Clone> CachedCommentFetcher<F> {
    /// Create a new cached fetcher
    ///
    /// # Arguments
    ///
    /// * `inner` - The fetcher to delegate cache misses to
    /// * `cache` - Shared cache instance
    /// * `mode` - Cache behavior mode
    pub fn new(inner: F, cache: Arc<Mutex<ResponseCache>>, mode: CacheMode) -> Self {
        Self { inner, cache, mode }
    }

    /// Get the current cache mode
    pub fn cache_mode(&self) -> CacheMode {
        self.mode
    }

    /// Create a new fetcher sharing the same cache with a different mode
    ///
    /// Useful for a "force refresh" fetcher.
    pub fn with_mode(&self, mode: CacheMode) -> CachedCommentFetcher<F> {
        CachedCommentFetcher {
            inner: self.inner.clone(),
            cache: Arc::clone(&self.cache),
            mode,
        }
    }

    /// Get a reference to the inner fetcher
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Drop cached responses for one comment
    pub fn invalidate(&self, id: &CommentId) {
        let removed = self.lock_cache().invalidate(id);
        debug!("Invalidated {} cached responses for {}", removed, id);
    }

    fn lock_cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Try to get a parsed response from cache
    fn try_cache_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.mode.should_read() {
            return None;
        }

        let body = self.lock_cache().get(key).map(|r| r.body.clone())?;
        match serde_json::from_str(&body) {
            Ok(value) => {
                debug!("Cache HIT for {}", key);
                Some(value)
            }
            Err(e) => {
                // Fall through to a fresh fetch
                debug!("Failed to parse cached response for {}: {}", key, e);
                None
            }
        }
    }

    /// Write a response to cache
    fn cache_set<T: Serialize>(&self, key: String, value: &T) {
        if !self.mode.should_write() {
            return;
        }

        match serde_json::to_string(value) {
            Ok(json) => self.lock_cache().set(key, json),
            Err(e) => debug!("Failed to serialize response for {}: {}", key, e),
        }
    }
}

#[async_trait]
impl<F: CommentFetcher + Clone> CommentFetcher for CachedCommentFetcher<F> {
    async fn fetch_children(
        &self,
        id: &CommentId,
        page: Option<&PageToken>,
    ) -> anyhow::Result<ChildrenPage> {
        let key = ResponseCache::children_key(id, page);

        if let Some(cached) = self.try_cache_get::<ChildrenPage>(&key) {
            return Ok(cached);
        }

        debug!("Cache MISS for {}", key);
        let fetched = self.inner.fetch_children(id, page).await?;
        self.cache_set(key, &fetched);
        Ok(fetched)
    }

    async fn fetch_ancestors(&self, id: &CommentId) -> anyhow::Result<Vec<RedditCommentData>> {
        let key = ResponseCache::ancestors_key(id);

        if let Some(cached) = self.try_cache_get::<Vec<RedditCommentData>>(&key) {
            return Ok(cached);
        }

        debug!("Cache MISS for {}", key);
        let ancestors = self.inner.fetch_ancestors(id).await?;
        self.cache_set(key, &ancestors);
        Ok(ancestors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FetchedComment;
    use chrono::DateTime;

    /// Mock fetcher for testing
    #[derive(Clone)]
    struct MockFetcher {
        children: Vec<FetchedComment>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockFetcher {
        fn new(children: Vec<FetchedComment>) -> Self {
            Self {
                children,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl CommentFetcher for MockFetcher {
        async fn fetch_children(
            &self,
            _id: &CommentId,
            _page: Option<&PageToken>,
        ) -> anyhow::Result<ChildrenPage> {
            *self.call_count.lock().unwrap() += 1;
            Ok(ChildrenPage {
                comments: self.children.clone(),
                more_count: Some(0),
                next_page: None,
            })
        }

        async fn fetch_ancestors(&self, id: &CommentId) -> anyhow::Result<Vec<RedditCommentData>> {
            *self.call_count.lock().unwrap() += 1;
            Ok(vec![create_test_comment(&format!("parent-of-{}", id))])
        }
    }

    fn create_test_comment(id: &str) -> RedditCommentData {
        RedditCommentData {
            id: CommentId::from(id),
            author: "testuser".to_string(),
            body: format!("Comment {}", id),
            score: 1,
            created_utc: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            parent_id: Some("t3_thread".to_string()),
            permalink: None,
        }
    }

    fn shared_cache() -> Arc<Mutex<ResponseCache>> {
        Arc::new(Mutex::new(ResponseCache::default()))
    }

    #[tokio::test]
    async fn test_cache_mode_none_skips_cache() {
        let mock = MockFetcher::new(vec![FetchedComment::leaf(create_test_comment("c1"))]);
        let fetcher = CachedCommentFetcher::new(mock.clone(), shared_cache(), CacheMode::None);
        let id = CommentId::from("root");

        fetcher.fetch_children(&id, None).await.unwrap();
        fetcher.fetch_children(&id, None).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_mode_read_write_caches() {
        let mock = MockFetcher::new(vec![FetchedComment::leaf(create_test_comment("c1"))]);
        let fetcher = CachedCommentFetcher::new(mock.clone(), shared_cache(), CacheMode::ReadWrite);
        let id = CommentId::from("root");

        let first = fetcher.fetch_children(&id, None).await.unwrap();
        let second = fetcher.fetch_children(&id, None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.call_count(), 1);

        fetcher.fetch_ancestors(&id).await.unwrap();
        fetcher.fetch_ancestors(&id).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_pages_are_cached_separately() {
        let mock = MockFetcher::new(vec![]);
        let fetcher = CachedCommentFetcher::new(mock.clone(), shared_cache(), CacheMode::ReadWrite);
        let id = CommentId::from("root");
        let token = "next".to_string();

        fetcher.fetch_children(&id, None).await.unwrap();
        fetcher.fetch_children(&id, Some(&token)).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_mode_write_only_skips_read() {
        let mock = MockFetcher::new(vec![]);
        let cache = shared_cache();
        let fetcher = CachedCommentFetcher::new(mock.clone(), cache.clone(), CacheMode::WriteOnly);
        let id = CommentId::from("root");

        fetcher.fetch_ancestors(&id).await.unwrap();
        fetcher.fetch_ancestors(&id).await.unwrap();
        assert_eq!(mock.call_count(), 2);

        // The responses were still written
        let reader = fetcher.with_mode(CacheMode::ReadOnly);
        reader.fetch_ancestors(&id).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_mode_read_only_skips_write() {
        let mock = MockFetcher::new(vec![]);
        let fetcher = CachedCommentFetcher::new(mock.clone(), shared_cache(), CacheMode::ReadOnly);
        let id = CommentId::from("root");

        fetcher.fetch_children(&id, None).await.unwrap();
        fetcher.fetch_children(&id, None).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unparsable_entry_falls_through() {
        let mock = MockFetcher::new(vec![]);
        let cache = shared_cache();
        let id = CommentId::from("root");
        cache
            .lock()
            .unwrap()
            .set(ResponseCache::children_key(&id, None), "not json");

        let fetcher = CachedCommentFetcher::new(mock.clone(), cache, CacheMode::ReadWrite);
        let page = fetcher.fetch_children(&id, None).await.unwrap();
        assert_eq!(page.more_count, Some(0));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let mock = MockFetcher::new(vec![]);
        let fetcher = CachedCommentFetcher::new(mock.clone(), shared_cache(), CacheMode::ReadWrite);
        let id = CommentId::from("root");

        fetcher.fetch_children(&id, None).await.unwrap();
        fetcher.invalidate(&id);
        fetcher.fetch_children(&id, None).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_with_mode_creates_new_fetcher() {
        let fetcher =
            CachedCommentFetcher::new(MockFetcher::new(vec![]), shared_cache(), CacheMode::ReadWrite);
        let force_refresh = fetcher.with_mode(CacheMode::WriteOnly);

        assert_eq!(force_refresh.cache_mode(), CacheMode::WriteOnly);
        assert_eq!(fetcher.cache_mode(), CacheMode::ReadWrite);
    }
}
