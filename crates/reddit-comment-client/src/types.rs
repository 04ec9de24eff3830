//! Reddit comment data transfer objects
//!
//! These types represent the comment payloads returned by the fetch layer.
//! They carry no tree state of their own; the tree crate wraps them in nodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fullname prefix Reddit uses for comments
const COMMENT_KIND_PREFIX: &str = "t1_";

/// Fullname prefix Reddit uses for links (the thread a comment belongs to)
const LINK_KIND_PREFIX: &str = "t3_";

/// Opaque continuation token for the next page of children
pub type PageToken = String;

/// Newtype wrapper for Reddit comment identifiers (base-36, without kind prefix)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    /// Create a comment id from its raw value
    pub fn new(value: impl Into<String>) -> Self {
        CommentId(value.into())
    }

    /// Get the raw id value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reddit fullname for this comment (e.g. `t1_abc123`)
    pub fn fullname(&self) -> String {
        format!("{}{}", COMMENT_KIND_PREFIX, self.0)
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(value: &str) -> Self {
        CommentId(value.to_string())
    }
}

impl From<String> for CommentId {
    fn from(value: String) -> Self {
        CommentId(value)
    }
}

/// A single comment as returned by the Reddit API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditCommentData {
    /// Comment id (without `t1_` prefix)
    pub id: CommentId,

    /// Author's username (`[deleted]` for removed accounts)
    pub author: String,

    /// Raw comment body (markdown)
    pub body: String,

    /// Net score
    pub score: i64,

    /// When the comment was posted
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_utc: DateTime<Utc>,

    /// Fullname of the parent (`t1_` comment or `t3_` link)
    pub parent_id: Option<String>,

    /// Relative permalink to the comment
    #[serde(default)]
    pub permalink: Option<String>,
}

impl RedditCommentData {
    /// Whether this comment replies directly to the thread
    ///
    /// A comment without a parent fullname is treated as top-level too.
    pub fn is_top_level(&self) -> bool {
        match &self.parent_id {
            None => true,
            Some(parent) => parent.starts_with(LINK_KIND_PREFIX),
        }
    }

    /// Id of the parent comment, if the parent is a comment
    pub fn parent_comment_id(&self) -> Option<CommentId> {
        self.parent_id
            .as_deref()
            .and_then(|parent| parent.strip_prefix(COMMENT_KIND_PREFIX))
            .map(CommentId::from)
    }
}

/// A comment together with the replies the listing returned inline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedComment {
    /// The comment payload
    pub data: RedditCommentData,

    /// Replies materialized in the same response, in display order
    #[serde(default)]
    pub replies: Vec<FetchedComment>,

    /// Number of further replies the listing reported but did not include
    #[serde(default)]
    pub more_replies: Option<u32>,
}

impl FetchedComment {
    /// A comment with no inline replies
    pub fn leaf(data: RedditCommentData) -> Self {
        Self {
            data,
            replies: Vec::new(),
            more_replies: None,
        }
    }
}

/// One page of children for a comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildrenPage {
    /// Children in source order (ranking is done by the fetch layer)
    pub comments: Vec<FetchedComment>,

    /// Children still not loaded after this page, if the source reports it
    pub more_count: Option<u32>,

    /// Token to request the following page
    pub next_page: Option<PageToken>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_comment(parent_id: Option<&str>) -> RedditCommentData {
        RedditCommentData {
            id: CommentId::from("abc123"),
            author: "testuser".to_string(),
            body: "Test comment".to_string(),
            score: 42,
            created_utc: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            parent_id: parent_id.map(str::to_string),
            permalink: None,
        }
    }

    #[test]
    fn test_comment_id_fullname() {
        let id = CommentId::from("abc123");
        assert_eq!(id.fullname(), "t1_abc123");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn test_top_level_detection() {
        assert!(create_test_comment(None).is_top_level());
        assert!(create_test_comment(Some("t3_thread")).is_top_level());
        assert!(!create_test_comment(Some("t1_parent")).is_top_level());
    }

    #[test]
    fn test_parent_comment_id() {
        assert_eq!(
            create_test_comment(Some("t1_parent")).parent_comment_id(),
            Some(CommentId::from("parent"))
        );
        assert_eq!(create_test_comment(Some("t3_thread")).parent_comment_id(), None);
    }

    #[test]
    fn test_comment_deserialization() {
        let json = r#"{
            "id": "k1x9",
            "author": "someone",
            "body": "hello",
            "score": -3,
            "created_utc": 1700000000,
            "parent_id": "t1_k1x8"
        }"#;
        let comment: RedditCommentData = serde_json::from_str(json).unwrap();
        assert_eq!(comment.id, CommentId::from("k1x9"));
        assert_eq!(comment.score, -3);
        assert_eq!(comment.created_utc.timestamp(), 1_700_000_000);
        assert!(comment.permalink.is_none());
    }

    #[test]
    fn test_fetched_comment_defaults() {
        let json = r#"{
            "data": {
                "id": "k1x9",
                "author": "someone",
                "body": "hello",
                "score": 1,
                "created_utc": 1700000000,
                "parent_id": null
            }
        }"#;
        let fetched: FetchedComment = serde_json::from_str(json).unwrap();
        assert!(fetched.replies.is_empty());
        assert_eq!(fetched.more_replies, None);
    }
}
