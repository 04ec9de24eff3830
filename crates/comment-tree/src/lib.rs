//! # comment-tree
//!
//! State manager for a Reddit-style nested comment thread whose parts are
//! loaded lazily: the ancestors above a comment shown out of context, and
//! further pages of replies below any comment.
//!
//! ## Design Principles
//!
//! The tree never talks to the network itself. Loads go through a
//! [`CommentFetcher`](reddit_comment_client::CommentFetcher) supplied by the
//! caller, and the rendering layer only sees the [`CommentTreeContext`]
//! capability set plus read access to the tree.
//!
//! ```text
//!   renderer ──► CommentTreeContext ──► CommentTreeStore ──► CommentFetcher
//!       ▲                                     │
//!       └────────── rows() / read() ◄─────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comment_tree::{CommentTree, CommentTreeContext, CommentTreeNode, CommentTreeStore};
//! use comment_tree_config::TreeConfig;
//!
//! let config = TreeConfig::load();
//! let tree = CommentTree::new(CommentTreeNode::with_more_children(root_comment, Some(12)));
//! let store: CommentTreeStore<WidgetId> = CommentTreeStore::from_config(api, &config, tree);
//!
//! store.load_children(&root_id).await?;
//! for row in store.rows() {
//!     render(row);
//! }
//! ```

pub mod context;
pub mod error;
mod in_flight;
pub mod model;
pub mod registry;
pub mod store;

pub use context::CommentTreeContext;
pub use error::CommentTreeError;
pub use in_flight::LoadKind;
pub use model::{CommentRow, CommentTree, CommentTreeNode, NodePolicy};
pub use registry::ElementRegistry;
pub use store::CommentTreeStore;

pub use reddit_comment_client::{CommentId, RedditCommentData};
