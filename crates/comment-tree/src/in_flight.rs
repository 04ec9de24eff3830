//! Bookkeeping for loads that are currently in flight.
//!
//! Each `(kind, comment)` pair has at most one in-flight load. The load runs
//! as its own task; callers that arrive while it runs await a clone of the
//! same shared handle. Every load carries a ticket; a load may only apply its
//! result if its ticket is still the registered one when it completes.

use crate::error::CommentTreeError;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use reddit_comment_client::CommentId;
use std::collections::{HashMap, HashSet};
use std::future::Future;

/// Joinable handle to an in-flight load.
pub(crate) type SharedLoad = Shared<BoxFuture<'static, Result<(), CommentTreeError>>>;

/// What a load fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
    /// The ancestor chain above a local root.
    Parent,
    /// The next page of children.
    Children,
}

/// Run `load` on its own task and return a joinable handle to its result.
///
/// The task runs to completion even when nobody awaits the handle.
pub(crate) fn spawn_load<F>(kind: LoadKind, id: &CommentId, load: F) -> SharedLoad
where
    F: Future<Output = Result<(), CommentTreeError>> + Send + 'static,
{
    let id = id.clone();
    tokio::spawn(load)
        .map(move |joined| {
            joined.unwrap_or_else(|e| {
                Err(CommentTreeError::FetchFailed {
                    id,
                    message: format!("{:?} load task failed: {}", kind, e),
                })
            })
        })
        .boxed()
        .shared()
}

struct InFlight {
    ticket: u64,
    load: SharedLoad,
}

#[derive(Default)]
pub(crate) struct InFlightLoads {
    next_ticket: u64,
    loads: HashMap<(LoadKind, CommentId), InFlight>,
}

impl InFlightLoads {
    /// Reserve a ticket for a load about to be started.
    pub(crate) fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Handle of the running load for `id`, if any.
    pub(crate) fn join(&self, kind: LoadKind, id: &CommentId) -> Option<SharedLoad> {
        self.loads
            .get(&(kind, id.clone()))
            .map(|in_flight| in_flight.load.clone())
    }

    pub(crate) fn insert(&mut self, kind: LoadKind, id: CommentId, ticket: u64, load: SharedLoad) {
        self.loads.insert((kind, id), InFlight { ticket, load });
    }

    pub(crate) fn contains(&self, kind: LoadKind, id: &CommentId) -> bool {
        self.loads.contains_key(&(kind, id.clone()))
    }

    /// Clear the entry for a completed load.
    ///
    /// Returns false when the entry was forgotten or replaced meanwhile,
    /// in which case the result must be discarded.
    pub(crate) fn finish(&mut self, kind: LoadKind, id: &CommentId, ticket: u64) -> bool {
        let key = (kind, id.clone());
        match self.loads.get(&key) {
            Some(in_flight) if in_flight.ticket == ticket => {
                self.loads.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Forget loads for comments that are no longer in the tree.
    pub(crate) fn retain_ids(&mut self, live: &HashSet<CommentId>) {
        self.loads.retain(|(_, id), _| live.contains(id));
    }

    /// Forget every load.
    pub(crate) fn clear(&mut self) {
        self.loads.clear();
    }
}
