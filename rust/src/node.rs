//! Node-level helpers: routing, duplicate-run positioning, and the
//! occupancy rules that drive splitting and rebalancing.
//!
//! Occupancy is counted in entries for leaves and in children for internal
//! nodes; the sentinel/null index-key slots never count. Bounds depend on
//! the tree order and on whether a node is the root, so the predicates live
//! on the tree rather than on the nodes.

use crate::types::{BPlusMultiMap, InternalNode, LeafNode, NodeId, NodeRef, NULL_NODE};

impl<K: Ord, V> LeafNode<K, V> {
    /// Number of entries stored in this leaf.
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    /// First slot of the duplicate run for `key`: the index of the first
    /// stored key that is not strictly less than `key`. Inserting here puts
    /// a new entry in front of any existing equal keys, which is what gives
    /// duplicates their LIFO behavior.
    pub(crate) fn run_start(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }
}

impl<K: Ord> InternalNode<K> {
    /// Route a search key to the child owning it: the child at the largest
    /// slot whose non-null index key is `<=` the key, defaulting to the
    /// leftmost child (its slot carries no lower bound). Null slots mark
    /// duplicate-run continuations and are skipped without ending the scan.
    pub(crate) fn route_child(&self, key: &K) -> NodeRef {
        let mut route = 0;
        for (slot, index_key) in self.keys.iter().enumerate() {
            if let Some(k) = index_key {
                if k > key {
                    break;
                }
                route = slot;
            }
        }
        self.children[route]
    }
}

impl<K: Ord + Clone, V> BPlusMultiMap<K, V> {
    /// ceil(m/2): the per-node occupancy floor shared by the underflow and
    /// borrow rules.
    pub(crate) fn min_occupancy(&self) -> usize {
        (self.order + 1) / 2
    }

    /// Parent ID of a node, `NULL_NODE` for the root.
    pub(crate) fn parent_id(&self, node: NodeRef) -> NodeId {
        match node {
            NodeRef::Leaf(id) => self.leaf(id).parent,
            NodeRef::Internal(id) => self.internal(id).parent,
        }
    }

    pub(crate) fn is_root(&self, node: NodeRef) -> bool {
        self.parent_id(node) == NULL_NODE
    }

    /// Occupancy: entries for a leaf, children for an internal node.
    pub(crate) fn occupancy(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(id) => self.leaf(id).len(),
            NodeRef::Internal(id) => self.internal(id).children.len(),
        }
    }

    /// Above-maximum check run after insertion.
    pub(crate) fn is_overflowing(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::Leaf(_) => self.occupancy(node) > self.order - 1,
            NodeRef::Internal(_) => self.occupancy(node) > self.order,
        }
    }

    /// Below-minimum check run after deletion. The root obeys looser rules:
    /// an internal root needs two children, a root leaf one entry.
    pub(crate) fn is_underflowing(&self, node: NodeRef) -> bool {
        let occupancy = self.occupancy(node);
        if self.is_root(node) {
            match node {
                NodeRef::Internal(_) => occupancy < 2,
                NodeRef::Leaf(_) => occupancy < 1,
            }
        } else {
            match node {
                NodeRef::Internal(_) => occupancy < self.min_occupancy(),
                NodeRef::Leaf(_) => occupancy < self.min_occupancy() - 1,
            }
        }
    }

    /// A sibling can lend an entry/child only while staying above the
    /// occupancy floor itself.
    pub(crate) fn can_lend(&self, node: NodeRef) -> bool {
        self.occupancy(node) > self.min_occupancy()
    }

    /// Rewrite a node's parent back-reference.
    pub(crate) fn set_parent(&mut self, node: NodeRef, parent: NodeId) {
        match node {
            NodeRef::Leaf(id) => self.leaf_mut(id).parent = parent,
            NodeRef::Internal(id) => self.internal_mut(id).parent = parent,
        }
    }
}
