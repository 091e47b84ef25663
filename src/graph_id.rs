#[cfg(not(feature = "unchecked"))]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of store identities.  Wrapping around after `usize::MAX` stores only
/// weakens the foreign-handle check, it never breaks a store.
#[cfg(not(feature = "unchecked"))]
static GRAPH_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Identity of one [`GraphStore`](crate::graph_store::GraphStore) instance,
/// stamped into every handle it hands out so that handles from another store
/// are rejected.  With the `unchecked` feature this is zero-sized and every
/// comparison succeeds.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct GraphId(#[cfg(not(feature = "unchecked"))] usize);

impl GraphId {
    pub fn new() -> Self {
        #[cfg(feature = "unchecked")]
        {
            GraphId()
        }
        #[cfg(not(feature = "unchecked"))]
        {
            GraphId(GRAPH_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
        }
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}
