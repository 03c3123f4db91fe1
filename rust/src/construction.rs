//! Construction and initialization logic for BPlusMultiMap and nodes.
//!
//! Order validation lives here, together with the node constructors used by
//! splits and root growth. A freshly constructed tree has no root at all;
//! the first insert creates a single-entry root leaf.

use crate::error::{InitResult, TreeError};
use crate::node_arena::NodeArena;
use crate::types::{BPlusMultiMap, InternalNode, LeafNode, MIN_ORDER, NULL_NODE};

/// Default order for trees built via `Default`.
pub const DEFAULT_ORDER: usize = 16;

impl<K, V> BPlusMultiMap<K, V> {
    /// Create an empty tree of the given order.
    ///
    /// The order is the maximum branching factor of an internal node;
    /// leaves hold at most `order - 1` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusmulti::BPlusMultiMap;
    ///
    /// let tree = BPlusMultiMap::<i32, String>::new(16).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BPlusMultiMap::<i32, String>::new(2).is_err());
    /// ```
    pub fn new(order: usize) -> InitResult<Self> {
        if order < MIN_ORDER {
            return Err(TreeError::invalid_order(order, MIN_ORDER));
        }
        Ok(Self {
            order,
            root: None,
            leaf_arena: NodeArena::new(),
            internal_arena: NodeArena::new(),
        })
    }

    /// Create an empty tree with the default order.
    pub fn with_default_order() -> Self {
        Self::new(DEFAULT_ORDER).expect("default order is valid")
    }

    /// The order `m` this tree was constructed with.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Remove every entry, returning the tree to the empty state.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.internal_arena.clear();
        self.root = None;
    }
}

impl<K, V> Default for BPlusMultiMap<K, V> {
    fn default() -> Self {
        Self::with_default_order()
    }
}

impl<K, V> LeafNode<K, V> {
    /// Create an unlinked empty leaf.
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            parent: NULL_NODE,
            prev: NULL_NODE,
            next: NULL_NODE,
        }
    }
}

impl<K> InternalNode<K> {
    /// Create an unlinked internal node with no children.
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            parent: NULL_NODE,
        }
    }
}

// Arena deallocation replaces freed slots with a default placeholder.
impl<K, V> Default for LeafNode<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Default for InternalNode<K> {
    fn default() -> Self {
        Self::new()
    }
}
