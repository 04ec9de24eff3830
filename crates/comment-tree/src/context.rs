//! The capability set handed to the rendering layer.

use crate::error::CommentTreeError;
use async_trait::async_trait;
use reddit_comment_client::CommentId;

/// Operations the rendering layer drives the comment tree with.
///
/// Passed explicitly to whatever renders the tree instead of being looked
/// up through a global registry.
///
/// # Example
///
/// ```ignore
/// async fn on_load_more_clicked<C: CommentTreeContext>(ctx: &C, id: &CommentId) {
///     if let Err(e) = ctx.load_children(id).await {
///         show_error(e.to_string());
///     }
/// }
/// ```
#[async_trait]
pub trait CommentTreeContext: Send + Sync {
    /// Handle type the renderer registers for focus and scroll targeting.
    type Element: Send;

    /// Fetch and splice the ancestors of a local root.
    ///
    /// Joins a parent load already running for the same comment.
    async fn load_parent(&self, id: &CommentId) -> Result<(), CommentTreeError>;

    /// Fetch and append the next page of children.
    ///
    /// Joins a children load already running for the same comment.
    async fn load_children(&self, id: &CommentId) -> Result<(), CommentTreeError>;

    /// Flip the collapsed flag of one comment and return the new value.
    ///
    /// Descendants keep their own flags.
    fn toggle_collapse(&self, id: &CommentId) -> Result<bool, CommentTreeError>;

    /// Associate a UI handle with a comment, or clear it with `None`.
    fn register_node_element(&self, id: &CommentId, element: Option<Self::Element>);
}
