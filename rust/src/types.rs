//! Core types and data structures for BPlusMultiMap.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the multimap implementation.

use crate::node_arena::NodeArena;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum order (maximum branching factor) for the tree.
pub(crate) const MIN_ORDER: usize = 3;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation.
pub type NodeId = u32;

/// Sentinel ID meaning "no node" (absent parent, chain end, ...).
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// B+ tree multimap: an ordered associative container that keeps multiple
/// entries under the same key, without dedicated overflow pages.
///
/// All entries live in leaf nodes, which form a doubly linked chain in
/// non-decreasing key order; internal nodes route lookups using *index keys*.
/// Repeated inserts of the same key stack distinct entries, and the most
/// recently inserted entry is the one observed first by `search` and
/// `delete` — duplicates behave like a per-key LIFO stack.
///
/// # Type Parameters
///
/// * `K` - Key type, `Ord + Clone`
/// * `V` - Value type (no bounds; values are moved in and out)
///
/// # Examples
///
/// ```
/// use bplusmulti::BPlusMultiMap;
///
/// let mut tree = BPlusMultiMap::new(4).unwrap();
/// tree.insert(1, "first");
/// tree.insert(1, "second");
///
/// assert_eq!(tree.search(&1), Some(&"second"));
/// assert_eq!(tree.delete(&1), Some("second"));
/// assert_eq!(tree.delete(&1), Some("first"));
/// assert_eq!(tree.delete(&1), None);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(log n)
/// - **Lookup**: O(log n)
/// - **Deletion**: O(log n)
/// - **Ordered iteration**: O(n) via the leaf chain
#[derive(Debug)]
pub struct BPlusMultiMap<K, V> {
    /// Order `m`: maximum branching factor of an internal node.
    pub(crate) order: usize,
    /// Root node; `None` means the tree is empty.
    pub(crate) root: Option<NodeRef>,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: NodeArena<LeafNode<K, V>>,
    /// Arena storage for internal nodes.
    pub(crate) internal_arena: NodeArena<InternalNode<K>>,
}

/// Leaf node holding the stored entries.
///
/// `keys` is non-decreasing; `keys[i]` pairs with `values[i]`. Within a run
/// of equal keys the most recently inserted entry sits first. `prev`/`next`
/// link the leaf into the full sorted chain.
#[derive(Debug)]
pub(crate) struct LeafNode<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) values: Vec<V>,
    pub(crate) parent: NodeId,
    pub(crate) prev: NodeId,
    pub(crate) next: NodeId,
}

/// Internal node routing lookups into its children.
///
/// `keys` and `children` have equal length: `keys[i]` is the index key
/// addressing `children[i]`. A `None` slot marks a child that only continues
/// a duplicate run started to its left (the first slot is the conventional
/// sentinel with no lower bound). Index keys are excluded from occupancy,
/// which is counted in children.
#[derive(Debug)]
pub(crate) struct InternalNode<K> {
    pub(crate) keys: Vec<Option<K>>,
    pub(crate) children: Vec<NodeRef>,
    pub(crate) parent: NodeId,
}

// ============================================================================
// NODE REFERENCES
// ============================================================================

/// Reference to a node in one of the two arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeRef {
    Leaf(NodeId),
    Internal(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub(crate) fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) => id,
            NodeRef::Internal(id) => id,
        }
    }
}
