//! Comment tree data structures.

pub mod node;
pub mod tree;

pub use node::{CommentTreeNode, NodePolicy};
pub use tree::{CommentRow, CommentTree};
