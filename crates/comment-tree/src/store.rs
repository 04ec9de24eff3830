//! Comment tree store: the concrete `CommentTreeContext`.

use crate::context::CommentTreeContext;
use crate::error::CommentTreeError;
use crate::in_flight::{spawn_load, InFlightLoads, LoadKind};
use crate::model::{CommentRow, CommentTree, CommentTreeNode, NodePolicy};
use crate::registry::ElementRegistry;
use async_trait::async_trait;
use comment_tree_config::TreeConfig;
use log::{debug, warn};
use reddit_comment_client::{
    CacheMode, CachedCommentFetcher, ChildrenPage, CommentFetcher, CommentId, PageToken,
    RedditCommentData, ResponseCache,
};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Owns the comment tree and coordinates loads against the fetch collaborator.
///
/// Cloning is cheap; clones share the same tree. The internal lock is only
/// taken for synchronous sections and never held while a fetch is pending,
/// so `toggle_collapse` and `register_node_element` stay usable while loads
/// are suspended.
pub struct CommentTreeStore<E> {
    inner: Arc<StoreInner<E>>,
}

impl<E> Clone for CommentTreeStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<E> {
    state: Mutex<StoreState<E>>,
    fetcher: Arc<dyn CommentFetcher>,
    policy: NodePolicy,
    fetch_timeout: Duration,
}

struct StoreState<E> {
    tree: CommentTree,
    elements: ElementRegistry<E>,
    in_flight: InFlightLoads,
}

impl<E: Send + 'static> CommentTreeStore<E> {
    /// Create a store over `tree` that loads through `fetcher`.
    pub fn new(fetcher: Arc<dyn CommentFetcher>, config: &TreeConfig, tree: CommentTree) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(StoreState {
                    tree,
                    elements: ElementRegistry::new(),
                    in_flight: InFlightLoads::default(),
                }),
                fetcher,
                policy: NodePolicy::from(config),
                fetch_timeout: config.fetch_timeout(),
            }),
        }
    }

    /// Create a store whose fetcher is wrapped in a response cache as configured.
    pub fn from_config<F>(fetcher: F, config: &TreeConfig, tree: CommentTree) -> Self
    where
        F: CommentFetcher + Clone + 'static,
    {
        let fetcher: Arc<dyn CommentFetcher> = match config.cache_mode {
            CacheMode::None => Arc::new(fetcher),
            mode => {
                let cache = Arc::new(Mutex::new(ResponseCache::with_ttl(config.cache_ttl())));
                Arc::new(CachedCommentFetcher::new(fetcher, cache, mode))
            }
        };
        Self::new(fetcher, config, tree)
    }

    /// Run `f` against the current tree.
    pub fn read<R>(&self, f: impl FnOnce(&CommentTree) -> R) -> R {
        f(&self.inner.lock().tree)
    }

    /// Copy of the current tree.
    pub fn snapshot(&self) -> CommentTree {
        self.read(CommentTree::clone)
    }

    /// Copy of a single node (with its subtree).
    pub fn node(&self, id: &CommentId) -> Option<CommentTreeNode> {
        self.read(|tree| tree.find(id).cloned())
    }

    /// Flattened rows for rendering.
    pub fn rows(&self) -> Vec<CommentRow> {
        self.read(CommentTree::flatten)
    }

    /// Whether a parent load is running for `id`.
    pub fn is_loading_parent(&self, id: &CommentId) -> bool {
        self.inner.lock().in_flight.contains(LoadKind::Parent, id)
    }

    /// Handle registered for `id`.
    pub fn element(&self, id: &CommentId) -> Option<E>
    where
        E: Clone,
    {
        self.inner.lock().elements.get(id).cloned()
    }

    /// Number of registered handles.
    pub fn element_count(&self) -> usize {
        self.inner.lock().elements.len()
    }

    /// Replace the whole tree.
    ///
    /// Loads still running are abandoned and their results discarded.
    pub fn replace_tree(&self, tree: CommentTree) {
        let mut state = self.inner.lock();
        state.tree = tree;
        state.in_flight.clear();
        let live = state.tree.ids();
        let dropped = state.elements.retain_ids(&live);
        debug!(
            "Replaced comment tree ({} comments, {} stale elements dropped)",
            live.len(),
            dropped
        );
    }

    /// Detach the subtree rooted at `id` and return it.
    pub fn remove_subtree(&self, id: &CommentId) -> Result<CommentTreeNode, CommentTreeError> {
        let mut state = self.inner.lock();
        let removed = state
            .tree
            .remove_subtree(id)
            .ok_or_else(|| CommentTreeError::NotFound(id.clone()))?;
        let live = state.tree.ids();
        state.in_flight.retain_ids(&live);
        let dropped = state.elements.retain_ids(&live);
        debug!(
            "Removed {} comments under {} ({} elements dropped)",
            removed.subtree_len(),
            id,
            dropped
        );
        Ok(removed)
    }

    async fn run_children_load(
        inner: Arc<StoreInner<E>>,
        id: CommentId,
        page: Option<PageToken>,
        ticket: u64,
    ) -> Result<(), CommentTreeError> {
        let fetched = inner
            .fetch(&id, inner.fetcher.fetch_children(&id, page.as_ref()))
            .await;

        let mut state = inner.lock();
        if !state.in_flight.finish(LoadKind::Children, &id, ticket) {
            debug!("Discarding children of {}: comment left the tree", id);
            return Ok(());
        }
        state.apply_children(&id, fetched, &inner.policy)
    }

    async fn run_parent_load(
        inner: Arc<StoreInner<E>>,
        id: CommentId,
        ticket: u64,
    ) -> Result<(), CommentTreeError> {
        let fetched = inner
            .fetch(&id, inner.fetcher.fetch_ancestors(&id))
            .await;

        let mut state = inner.lock();
        if !state.in_flight.finish(LoadKind::Parent, &id, ticket) {
            debug!("Discarding ancestors of {}: comment left the tree", id);
            return Ok(());
        }
        match fetched {
            Ok(ancestors) => state.splice_ancestors(&id, ancestors),
            Err(e) => {
                warn!("Loading parents of {} failed: {}", id, e);
                Err(e)
            }
        }
    }
}

impl<E> StoreInner<E> {
    fn lock(&self) -> MutexGuard<'_, StoreState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Await a collaborator request, bounded by the fetch timeout.
    async fn fetch<T>(
        &self,
        id: &CommentId,
        request: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, CommentTreeError> {
        match tokio::time::timeout(self.fetch_timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CommentTreeError::fetch_failed(id, &e)),
            Err(_) => Err(CommentTreeError::FetchFailed {
                id: id.clone(),
                message: format!("timed out after {}s", self.fetch_timeout.as_secs()),
            }),
        }
    }
}

impl<E> StoreState<E> {
    fn apply_children(
        &mut self,
        id: &CommentId,
        fetched: Result<ChildrenPage, CommentTreeError>,
        policy: &NodePolicy,
    ) -> Result<(), CommentTreeError> {
        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                if let Some(node) = self.tree.find_mut(id) {
                    node.is_loading_children = false;
                }
                warn!("Loading children of {} failed: {}", id, e);
                return Err(e);
            }
        };

        let mut seen = self.tree.ids();
        let children = CommentTreeNode::materialize_all(page.comments, policy, &mut seen);

        let Some(node) = self.tree.find_mut(id) else {
            return Ok(());
        };
        debug!("Loaded {} children for {}", children.len(), id);
        node.children.extend(children);
        node.set_more_children(page.more_count, page.next_page);
        node.children_loaded = true;
        node.is_loading_children = false;
        Ok(())
    }

    fn splice_ancestors(
        &mut self,
        id: &CommentId,
        ancestors: Vec<RedditCommentData>,
    ) -> Result<(), CommentTreeError> {
        if ancestors.is_empty() {
            debug!("No ancestors above {}", id);
            return Ok(());
        }
        if self.tree.root().map(CommentTreeNode::id) != Some(id) {
            debug!("Discarding ancestors of {}: no longer the root", id);
            return Ok(());
        }

        let mut seen = self.tree.ids();
        if let Some(duplicate) = ancestors.iter().find(|data| !seen.insert(data.id.clone())) {
            warn!("Rejecting ancestors of {}: {} repeats", id, duplicate.id);
            return Err(CommentTreeError::InvalidResponse {
                id: id.clone(),
                reason: format!("ancestor {} is already in the tree", duplicate.id),
            });
        }

        let Some(mut current) = self.tree.take_root() else {
            return Ok(());
        };
        let count = ancestors.len();
        for data in ancestors.into_iter().rev() {
            let mut parent = CommentTreeNode::ancestor(data);
            parent.children.push(current);
            current = parent;
        }
        self.tree.set_root(current);
        debug!("Spliced {} ancestors above {}", count, id);
        Ok(())
    }
}

#[async_trait]
impl<E: Send + 'static> CommentTreeContext for CommentTreeStore<E> {
    type Element = E;

    async fn load_parent(&self, id: &CommentId) -> Result<(), CommentTreeError> {
        let load = {
            let mut state = self.inner.lock();
            let joined = state.in_flight.join(LoadKind::Parent, id);
            match joined {
                Some(load) => {
                    debug!("Joining parent load for {}", id);
                    load
                }
                None => {
                    let root = state
                        .tree
                        .root()
                        .ok_or_else(|| CommentTreeError::NotFound(id.clone()))?;
                    if root.id() != id {
                        if state.tree.contains(id) {
                            debug!("{} is not a local root, its parent is loaded", id);
                            return Ok(());
                        }
                        return Err(CommentTreeError::NotFound(id.clone()));
                    }
                    if root.data.is_top_level() {
                        debug!("{} is a top-level comment, nothing above it", id);
                        return Ok(());
                    }

                    let ticket = state.in_flight.issue_ticket();
                    let load = spawn_load(
                        LoadKind::Parent,
                        id,
                        Self::run_parent_load(Arc::clone(&self.inner), id.clone(), ticket),
                    );
                    state
                        .in_flight
                        .insert(LoadKind::Parent, id.clone(), ticket, load.clone());
                    load
                }
            }
        };

        load.await
    }

    async fn load_children(&self, id: &CommentId) -> Result<(), CommentTreeError> {
        let load = {
            let mut state = self.inner.lock();
            let joined = state.in_flight.join(LoadKind::Children, id);
            match joined {
                Some(load) => {
                    debug!("Joining children load for {}", id);
                    load
                }
                None => {
                    let node = state
                        .tree
                        .find_mut(id)
                        .ok_or_else(|| CommentTreeError::NotFound(id.clone()))?;
                    if !node.has_more_children() {
                        debug!("{} has no more children to load", id);
                        return Ok(());
                    }
                    node.is_loading_children = true;
                    let page = node.next_page.clone();

                    let ticket = state.in_flight.issue_ticket();
                    let load = spawn_load(
                        LoadKind::Children,
                        id,
                        Self::run_children_load(Arc::clone(&self.inner), id.clone(), page, ticket),
                    );
                    state
                        .in_flight
                        .insert(LoadKind::Children, id.clone(), ticket, load.clone());
                    load
                }
            }
        };

        load.await
    }

    fn toggle_collapse(&self, id: &CommentId) -> Result<bool, CommentTreeError> {
        let mut state = self.inner.lock();
        let node = state
            .tree
            .find_mut(id)
            .ok_or_else(|| CommentTreeError::NotFound(id.clone()))?;
        node.collapsed = !node.collapsed;
        debug!(
            "{} {}",
            if node.collapsed { "Collapsed" } else { "Expanded" },
            id
        );
        Ok(node.collapsed)
    }

    fn register_node_element(&self, id: &CommentId, element: Option<E>) {
        let mut state = self.inner.lock();
        if element.is_some() && !state.tree.contains(id) {
            warn!("Ignoring element for {}: comment is not in the tree", id);
            return;
        }
        state.elements.register(id, element);
    }
}
