//! Host document abstraction.
//!
//! [`HostDocument`] is the slice of a DOM the filter needs: structural
//! queries, text reads, inline-style and attribute writes, moving children,
//! creating elements, click listeners and a subscription to subtree
//! additions. Nodes are addressed by [`NodeId`], an opaque arena index, so
//! post identity never depends on reference equality.

mod memory;
mod selector;

pub use memory::{El, MemoryDocument};
pub use selector::{Selector, SelectorError};

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

/// Opaque, stable identifier of a node in a [`HostDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw numeric value, for logging.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One delivery of subtree-addition notifications.
///
/// `added` holds the root of every subtree inserted into the connected
/// document since the previous batch, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBatch {
    /// Roots of the added subtrees.
    pub added: Vec<NodeId>,
}

/// Stream of [`MutationBatch`]es. Ends when the document is dropped.
pub type MutationStream = UnboundedReceiver<MutationBatch>;

/// Click listener. Receives the document so it can mutate styles.
pub type ClickHandler = Arc<dyn Fn(&dyn HostDocument) + Send + Sync>;

/// A live document the filter reads and mutates in place.
///
/// All methods are infallible: an id that does not name a node (or names a
/// text node where an element is expected) yields an empty result or a
/// no-op, never a panic.
pub trait HostDocument: Send + Sync {
    /// The `<body>` element. Mutation notifications cover its subtree.
    fn body(&self) -> NodeId;

    /// Whether `node` is an element (as opposed to text or unknown).
    fn is_element(&self, node: NodeId) -> bool;

    /// All element descendants of `scope` (excluding `scope` itself) that
    /// match `selector`, in document order.
    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId>;

    /// First element descendant of `scope` matching `selector`.
    fn query(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Nearest inclusive ancestor of `node` matching `selector`.
    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId>;

    /// Concatenated text of every descendant text node.
    fn text_content(&self, node: NodeId) -> String;

    /// Rendered text: skips hidden subtrees and breaks lines between blocks.
    fn inner_text(&self, node: NodeId) -> String;

    /// Direct children, elements and text alike.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Parent node, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Read an attribute.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Set an attribute.
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    /// Read an inline style property. An empty value reads as `None`.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Set an inline style property. An empty value clears it.
    fn set_style(&self, node: NodeId, property: &str, value: &str);

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> NodeId;

    /// Replace the children of `node` with a single text node.
    fn set_text(&self, node: NodeId, text: &str);

    /// Move `child` (with its subtree) to the end of `parent`'s children,
    /// detaching it from any previous parent first.
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Register a click listener on `node`.
    fn add_click_listener(&self, node: NodeId, handler: ClickHandler);

    /// Dispatch a click to `node`'s listeners.
    fn click(&self, node: NodeId);

    /// Subscribe to subtree additions under [`body`](Self::body).
    fn subscribe(&self) -> MutationStream;
}
