//! Comment fetcher trait and cache mode definitions
//!
//! This module defines the core `CommentFetcher` trait that every fetch
//! collaborator must satisfy, as well as the `CacheMode` enum for
//! controlling caching behavior.

use crate::types::{ChildrenPage, CommentId, PageToken, RedditCommentData};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Cache behavior mode for comment fetchers
///
/// Controls how the fetcher interacts with the cache layer.
/// This is set at construction time, not per-request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// No caching - neither read nor write
    None,

    /// Write-only - skip cache reads, but write responses to cache
    /// Use for "force refresh" to get fresh data while populating cache
    WriteOnly,

    /// Read-only - read from cache, but don't update it
    /// Use for offline mode or when preserving cache state
    ReadOnly,

    /// Full caching - read from cache, write to cache
    #[default]
    ReadWrite,
}

impl CacheMode {
    /// Should we attempt to read from cache before fetching?
    pub fn should_read(&self) -> bool {
        matches!(self, CacheMode::ReadOnly | CacheMode::ReadWrite)
    }

    /// Should we write fetched responses to cache?
    pub fn should_write(&self) -> bool {
        matches!(self, CacheMode::WriteOnly | CacheMode::ReadWrite)
    }
}

/// Comment fetch collaborator
///
/// Defines how the comment tree obtains comments it has not materialized yet.
/// Implementations can be direct (hitting the API) or decorated with caching,
/// rate limiting, retry logic, etc.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use reddit_comment_client::{CommentFetcher, CommentId};
///
/// async fn first_page(fetcher: &dyn CommentFetcher) -> anyhow::Result<usize> {
///     let page = fetcher.fetch_children(&CommentId::from("k1x9"), None).await?;
///     Ok(page.comments.len())
/// }
/// ```
#[async_trait]
pub trait CommentFetcher: Send + Sync {
    /// Fetch the next page of direct children of a comment
    ///
    /// # Arguments
    ///
    /// * `id` - The comment whose children are requested
    /// * `page` - Continuation token from the previous page, `None` for the first page
    ///
    /// # Returns
    ///
    /// The children in display order plus the remaining count and next token.
    async fn fetch_children(
        &self,
        id: &CommentId,
        page: Option<&PageToken>,
    ) -> anyhow::Result<ChildrenPage>;

    /// Fetch the ancestor chain of a comment
    ///
    /// # Arguments
    ///
    /// * `id` - The comment whose ancestors are requested
    ///
    /// # Returns
    ///
    /// Ancestors ordered from the thread's top-level comment down to the
    /// direct parent of `id`. Empty for a top-level comment.
    async fn fetch_ancestors(&self, id: &CommentId) -> anyhow::Result<Vec<RedditCommentData>>;
}

/// A fetcher for when loading is disabled (offline or read-only views).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCommentFetcher;

#[async_trait]
impl CommentFetcher for NoOpCommentFetcher {
    async fn fetch_children(
        &self,
        _id: &CommentId,
        _page: Option<&PageToken>,
    ) -> anyhow::Result<ChildrenPage> {
        anyhow::bail!("Loading children is disabled")
    }

    async fn fetch_ancestors(&self, _id: &CommentId) -> anyhow::Result<Vec<RedditCommentData>> {
        anyhow::bail!("Loading parent comments is disabled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_mode_default() {
        assert_eq!(CacheMode::default(), CacheMode::ReadWrite);
    }

    #[test]
    fn test_cache_mode_should_read() {
        assert!(!CacheMode::None.should_read());
        assert!(!CacheMode::WriteOnly.should_read());
        assert!(CacheMode::ReadOnly.should_read());
        assert!(CacheMode::ReadWrite.should_read());
    }

    #[test]
    fn test_cache_mode_should_write() {
        assert!(!CacheMode::None.should_write());
        assert!(CacheMode::WriteOnly.should_write());
        assert!(!CacheMode::ReadOnly.should_write());
        assert!(CacheMode::ReadWrite.should_write());
    }

    #[tokio::test]
    async fn test_noop_fetcher_always_fails() {
        let fetcher = NoOpCommentFetcher;
        let id = CommentId::from("abc");
        assert!(fetcher.fetch_children(&id, None).await.is_err());
        assert!(fetcher.fetch_ancestors(&id).await.is_err());
    }
}
