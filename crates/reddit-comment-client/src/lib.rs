//! Reddit comment fetching contract with caching support
//!
//! This crate defines the payloads a comment tree is built from and the
//! trait-based fetcher the tree calls into when it needs more comments.
//! Like any API client layer, caching is composed as a decorator around the
//! base fetcher.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              CommentFetcher trait                │
//! │  - fetch_children()                              │
//! │  - fetch_ancestors()                             │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ (your fetcher)  │         │ CachedCommentFetcher│
//! │ (direct API)    │◄────────│ (decorator)         │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use reddit_comment_client::{CachedCommentFetcher, CacheMode, CommentFetcher, ResponseCache};
//! use std::sync::{Arc, Mutex};
//!
//! let cache = Arc::new(Mutex::new(ResponseCache::default()));
//! let fetcher = CachedCommentFetcher::new(my_api_fetcher, cache, CacheMode::ReadWrite);
//!
//! let page = fetcher.fetch_children(&"c0ffee".into(), None).await?;
//! ```

pub mod cache;
pub mod cached_fetcher;
pub mod fetcher;
pub mod types;

pub use cache::{CacheStats, CachedResponse, ResponseCache};
pub use cached_fetcher::CachedCommentFetcher;
pub use fetcher::{CacheMode, CommentFetcher, NoOpCommentFetcher};
pub use types::{ChildrenPage, CommentId, FetchedComment, PageToken, RedditCommentData};
