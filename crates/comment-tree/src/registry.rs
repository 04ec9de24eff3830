//! Registry of UI element handles supplied by the rendering layer.

use reddit_comment_client::CommentId;
use std::collections::{HashMap, HashSet};

/// Maps comment ids to handles owned by the rendering layer.
///
/// The registry only stores the mapping; what a handle refers to
/// is up to the renderer (a widget id, a weak reference, ...).
#[derive(Debug, Clone)]
pub struct ElementRegistry<E> {
    elements: HashMap<CommentId, E>,
}

impl<E> Default for ElementRegistry<E> {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }
}

impl<E> ElementRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a handle with `id`, or clear the association with `None`.
    ///
    /// Returns the previously registered handle.
    pub fn register(&mut self, id: &CommentId, element: Option<E>) -> Option<E> {
        match element {
            Some(element) => self.elements.insert(id.clone(), element),
            None => self.elements.remove(id),
        }
    }

    pub fn get(&self, id: &CommentId) -> Option<&E> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Drop every handle whose id is not in `live`.
    ///
    /// Returns the number of dropped handles.
    pub fn retain_ids(&mut self, live: &HashSet<CommentId>) -> usize {
        let before = self.elements.len();
        self.elements.retain(|id, _| live.contains(id));
        before - self.elements.len()
    }
}
