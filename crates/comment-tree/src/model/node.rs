//! Comment tree node.

use comment_tree_config::TreeConfig;
use reddit_comment_client::{CommentId, FetchedComment, PageToken, RedditCommentData};
use std::collections::HashSet;

/// Rules applied to comments when they are materialized into nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodePolicy {
    /// Comments scoring below this start collapsed.
    pub collapse_below_score: Option<i64>,
}

impl NodePolicy {
    fn starts_collapsed(&self, data: &RedditCommentData) -> bool {
        self.collapse_below_score
            .is_some_and(|threshold| data.score < threshold)
    }
}

impl From<&TreeConfig> for NodePolicy {
    fn from(config: &TreeConfig) -> Self {
        Self {
            collapse_below_score: config.collapse_below_score,
        }
    }
}

/// A comment in the tree together with its display and loading state.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentTreeNode {
    /// The comment payload.
    pub data: RedditCommentData,
    /// Materialized children in display order.
    pub children: Vec<CommentTreeNode>,
    /// Whether the subtree is hidden. Does not change `children`.
    pub collapsed: bool,
    has_more_children: bool,
    more_children_count: Option<u32>,
    /// A children load is in flight.
    pub is_loading_children: bool,
    /// A children load has completed at least once.
    pub children_loaded: bool,
    /// Continuation token for the next children page.
    pub(crate) next_page: Option<PageToken>,
}

impl CommentTreeNode {
    /// Create a node with no children and nothing more to load.
    pub fn new(data: RedditCommentData) -> Self {
        Self {
            data,
            children: Vec::new(),
            collapsed: false,
            has_more_children: false,
            more_children_count: None,
            is_loading_children: false,
            children_loaded: false,
            next_page: None,
        }
    }

    /// Create a node whose children still have to be loaded.
    pub fn with_more_children(data: RedditCommentData, count: Option<u32>) -> Self {
        let mut node = Self::new(data);
        node.has_more_children = count != Some(0);
        node.more_children_count = count;
        node
    }

    /// Create an ancestor spliced in above a local root.
    ///
    /// Only the path down to the local root is known, so the ancestor
    /// reports more children of unknown count.
    pub(crate) fn ancestor(data: RedditCommentData) -> Self {
        Self::with_more_children(data, None)
    }

    /// Build a node (and its inline replies) from a fetched comment.
    pub fn from_fetched(fetched: FetchedComment, policy: &NodePolicy) -> Self {
        let mut seen = HashSet::new();
        Self::materialize(fetched, policy, &mut seen)
    }

    /// Build nodes from fetched comments, skipping ids in `seen`.
    ///
    /// Every materialized id is added to `seen`.
    pub(crate) fn materialize_all(
        comments: Vec<FetchedComment>,
        policy: &NodePolicy,
        seen: &mut HashSet<CommentId>,
    ) -> Vec<CommentTreeNode> {
        let mut nodes = Vec::with_capacity(comments.len());
        for fetched in comments {
            if seen.contains(&fetched.data.id) {
                log::debug!("Skipping duplicate comment {}", fetched.data.id);
                continue;
            }
            nodes.push(Self::materialize(fetched, policy, seen));
        }
        nodes
    }

    fn materialize(
        fetched: FetchedComment,
        policy: &NodePolicy,
        seen: &mut HashSet<CommentId>,
    ) -> Self {
        seen.insert(fetched.data.id.clone());

        let mut node = Self::new(fetched.data);
        node.collapsed = policy.starts_collapsed(&node.data);
        node.set_more_children(fetched.more_replies, None);
        node.children = Self::materialize_all(fetched.replies, policy, seen);
        node
    }

    /// Identifier of this comment.
    pub fn id(&self) -> &CommentId {
        &self.data.id
    }

    /// Update the remaining-children bookkeeping.
    ///
    /// A reported count of zero always means there is nothing more to load;
    /// without a count, a continuation token decides.
    pub fn set_more_children(&mut self, count: Option<u32>, next_page: Option<PageToken>) {
        self.has_more_children = match count {
            Some(0) => false,
            Some(_) => true,
            None => next_page.is_some(),
        };
        self.more_children_count = count;
        self.next_page = next_page;
    }

    /// The source reports children beyond those materialized.
    pub fn has_more_children(&self) -> bool {
        self.has_more_children
    }

    /// Number of children not yet loaded, when the source reports it.
    pub fn more_children_count(&self) -> Option<u32> {
        self.more_children_count
    }

    /// Continuation token for the next children page.
    pub fn next_page(&self) -> Option<&PageToken> {
        self.next_page.as_ref()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CommentTreeNode::subtree_len)
            .sum::<usize>()
    }

    pub(crate) fn collect_ids(&self, ids: &mut HashSet<CommentId>) {
        ids.insert(self.data.id.clone());
        for child in &self.children {
            child.collect_ids(ids);
        }
    }
}
