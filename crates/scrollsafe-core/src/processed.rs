//! Posts already routed through the pipeline.

use dashmap::DashSet;

use scrollsafe_platform::NodeId;

/// Set of post anchors that have been dispatched.
///
/// [`insert`](Self::insert) is an atomic test-and-insert, so two
/// discoveries of the same post racing each other dispatch it once.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    seen: DashSet<NodeId>,
}

impl ProcessedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `anchor` processed. Returns `false` if it already was.
    pub fn insert(&self, anchor: NodeId) -> bool {
        self.seen.insert(anchor)
    }

    /// Whether `anchor` has been dispatched.
    pub fn contains(&self, anchor: NodeId) -> bool {
        self.seen.contains(&anchor)
    }

    /// Number of dispatched posts.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been dispatched yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
