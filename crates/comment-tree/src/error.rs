//! Errors reported by comment tree operations.

use reddit_comment_client::CommentId;
use thiserror::Error;

/// Errors that can occur while operating on the comment tree.
///
/// Cloneable so every caller joined onto the same in-flight load receives it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentTreeError {
    /// The referenced comment is not in the tree.
    #[error("Comment not found: {0}")]
    NotFound(CommentId),

    /// The fetch collaborator failed or timed out.
    #[error("Failed to fetch comments for {id}: {message}")]
    FetchFailed {
        /// Comment the load was issued for.
        id: CommentId,
        /// Collaborator error, rendered for display.
        message: String,
    },

    /// The fetch collaborator returned data that cannot be merged.
    #[error("Invalid response for {id}: {reason}")]
    InvalidResponse {
        /// Comment the load was issued for.
        id: CommentId,
        /// What was wrong with the response.
        reason: String,
    },
}

impl CommentTreeError {
    pub(crate) fn fetch_failed(id: &CommentId, error: &anyhow::Error) -> Self {
        CommentTreeError::FetchFailed {
            id: id.clone(),
            message: format!("{:#}", error),
        }
    }
}
