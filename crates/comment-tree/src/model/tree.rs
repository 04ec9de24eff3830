//! Comment tree and its flattened render rows.

use super::CommentTreeNode;
use reddit_comment_client::CommentId;
use std::collections::HashSet;

/// A tree of comments rooted at a single (possibly local) root.
///
/// Parentage is positional: nodes never point back at their parent, so
/// parent lookups walk down from the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentTree {
    root: Option<CommentTreeNode>,
}

impl CommentTree {
    /// Create a tree with the given root.
    pub fn new(root: CommentTreeNode) -> Self {
        Self { root: Some(root) }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&CommentTreeNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, CommentTreeNode::subtree_len)
    }

    /// Find a node by id.
    pub fn find(&self, id: &CommentId) -> Option<&CommentTreeNode> {
        self.root.as_ref().and_then(|root| find_in(root, id))
    }

    /// Find a node by id mutably.
    pub fn find_mut(&mut self, id: &CommentId) -> Option<&mut CommentTreeNode> {
        self.root.as_mut().and_then(|root| find_in_mut(root, id))
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.find(id).is_some()
    }

    /// All ids currently in the tree.
    pub fn ids(&self) -> HashSet<CommentId> {
        let mut ids = HashSet::new();
        if let Some(root) = &self.root {
            root.collect_ids(&mut ids);
        }
        ids
    }

    /// The materialized parent of a node (None for the root or unknown ids).
    pub fn parent_of(&self, id: &CommentId) -> Option<&CommentTreeNode> {
        self.root.as_ref().and_then(|root| parent_in(root, id))
    }

    /// Ids from the root down to `id`, inclusive.
    pub fn path_to(&self, id: &CommentId) -> Option<Vec<CommentId>> {
        let root = self.root.as_ref()?;
        let mut path = Vec::new();
        path_in(root, id, &mut path).then_some(path)
    }

    /// Detach the subtree rooted at `id`.
    ///
    /// Removing the root leaves the tree empty.
    pub fn remove_subtree(&mut self, id: &CommentId) -> Option<CommentTreeNode> {
        if self.root.as_ref().is_some_and(|root| root.id() == id) {
            return self.root.take();
        }
        self.root.as_mut().and_then(|root| remove_in(root, id))
    }

    pub(crate) fn take_root(&mut self) -> Option<CommentTreeNode> {
        self.root.take()
    }

    pub(crate) fn set_root(&mut self, root: CommentTreeNode) {
        self.root = Some(root);
    }

    /// Flatten the tree into rows for rendering (respecting collapsed state).
    pub fn flatten(&self) -> Vec<CommentRow> {
        let mut rows = Vec::new();
        if let Some(root) = &self.root {
            if !root.data.is_top_level() {
                rows.push(CommentRow::LoadParent {
                    id: root.id().clone(),
                });
            }
            flatten_into(root, 0, &mut rows);
        }
        rows
    }
}

/// A single row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentRow {
    /// The root's ancestors are not loaded yet ("continue this thread").
    LoadParent { id: CommentId },
    /// A visible comment.
    Comment {
        id: CommentId,
        depth: usize,
        collapsed: bool,
        /// Materialized children (hidden ones included).
        child_count: usize,
    },
    /// Placeholder for children that can still be loaded.
    LoadMore {
        parent: CommentId,
        depth: usize,
        count: Option<u32>,
        loading: bool,
    },
}

fn flatten_into(node: &CommentTreeNode, depth: usize, rows: &mut Vec<CommentRow>) {
    rows.push(CommentRow::Comment {
        id: node.id().clone(),
        depth,
        collapsed: node.collapsed,
        child_count: node.children.len(),
    });

    if node.collapsed {
        return;
    }

    for child in &node.children {
        flatten_into(child, depth + 1, rows);
    }

    if node.has_more_children() {
        rows.push(CommentRow::LoadMore {
            parent: node.id().clone(),
            depth: depth + 1,
            count: node.more_children_count(),
            loading: node.is_loading_children,
        });
    }
}

fn find_in<'a>(node: &'a CommentTreeNode, id: &CommentId) -> Option<&'a CommentTreeNode> {
    if node.id() == id {
        return Some(node);
    }
    node.children.iter().find_map(|child| find_in(child, id))
}

fn find_in_mut<'a>(
    node: &'a mut CommentTreeNode,
    id: &CommentId,
) -> Option<&'a mut CommentTreeNode> {
    if node.id() == id {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_in_mut(child, id))
}

fn parent_in<'a>(node: &'a CommentTreeNode, id: &CommentId) -> Option<&'a CommentTreeNode> {
    if node.children.iter().any(|child| child.id() == id) {
        return Some(node);
    }
    node.children.iter().find_map(|child| parent_in(child, id))
}

fn path_in(node: &CommentTreeNode, id: &CommentId, path: &mut Vec<CommentId>) -> bool {
    path.push(node.id().clone());
    if node.id() == id {
        return true;
    }
    for child in &node.children {
        if path_in(child, id, path) {
            return true;
        }
    }
    path.pop();
    false
}

fn remove_in(node: &mut CommentTreeNode, id: &CommentId) -> Option<CommentTreeNode> {
    if let Some(pos) = node.children.iter().position(|child| child.id() == id) {
        return Some(node.children.remove(pos));
    }
    node.children
        .iter_mut()
        .find_map(|child| remove_in(child, id))
}
