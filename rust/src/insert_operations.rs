//! Insert and overflow resolution.
//!
//! An insert locates the owning leaf, places the entry at the front of its
//! key's duplicate run, refreshes index keys to their fixed point, and then
//! resolves overflow by splitting upward. A split is purely local to the
//! immediate parent: the subtree's keyset and leftmost-novel-key identity
//! are unchanged by the topology change, so no further upward index-key
//! propagation is needed.

use crate::types::{BPlusMultiMap, InternalNode, LeafNode, NodeId, NodeRef, NULL_NODE};

impl<K: Ord + Clone, V> BPlusMultiMap<K, V> {
    /// Insert an entry. Never overwrites: repeated inserts of the same key
    /// stack distinct entries, most recent first.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusmulti::BPlusMultiMap;
    ///
    /// let mut tree = BPlusMultiMap::new(4).unwrap();
    /// tree.insert(1, "a");
    /// tree.insert(1, "b");
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.search(&1), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) {
        if self.root.is_none() {
            let id = self.leaf_arena.allocate(LeafNode {
                keys: vec![key],
                values: vec![value],
                parent: NULL_NODE,
                prev: NULL_NODE,
                next: NULL_NODE,
            });
            self.root = Some(NodeRef::Leaf(id));
            return;
        }

        let leaf_id = self.locate_leaf(&key);
        let slot = self.leaf(leaf_id).run_start(&key);
        {
            let leaf = self.leaf_mut(leaf_id);
            leaf.keys.insert(slot, key);
            leaf.values.insert(slot, value);
        }
        self.refresh_index_keys_after_insert(leaf_id);
        self.resolve_overflow(NodeRef::Leaf(leaf_id));
    }

    /// A changed leaf index key can shift ancestors' keys; chase it upward
    /// to the fixed point.
    fn refresh_index_keys_after_insert(&mut self, leaf_id: NodeId) {
        if self.update_index_key(NodeRef::Leaf(leaf_id)) {
            let parent = self.leaf(leaf_id).parent;
            self.propagate_index_key_update(NodeRef::Internal(parent));
        }
    }

    // ========================================================================
    // OVERFLOW RESOLUTION
    // ========================================================================

    /// Split overflowing nodes, cascading upward until a level fits.
    pub(crate) fn resolve_overflow(&mut self, mut node: NodeRef) {
        while self.is_overflowing(node) {
            let right = self.split(node);
            let parent = self.parent_id(node);
            if parent == NULL_NODE {
                self.grow_root(node, right);
                break;
            }
            let (parent, slot) = self
                .position_in_parent(node)
                .expect("non-root node has a parent slot");
            self.update_index_key(node);
            let right_key = self.index_key(right);
            let parent_node = self.internal_mut(parent);
            parent_node.keys.insert(slot + 1, right_key);
            parent_node.children.insert(slot + 1, right);
            node = NodeRef::Internal(parent);
        }
    }

    /// Replace a split root with a new two-child root.
    fn grow_root(&mut self, left: NodeRef, right: NodeRef) {
        let keys = vec![self.index_key(left), self.index_key(right)];
        let id = self.internal_arena.allocate(InternalNode {
            keys,
            children: vec![left, right],
            parent: NULL_NODE,
        });
        self.set_parent(left, id);
        self.set_parent(right, id);
        self.root = Some(NodeRef::Internal(id));
    }

    /// Split a node at its occupancy midpoint, returning the new right
    /// sibling. The floor-half midpoint keeps both halves above their
    /// underflow minimum.
    fn split(&mut self, node: NodeRef) -> NodeRef {
        match node {
            NodeRef::Leaf(id) => NodeRef::Leaf(self.split_leaf(id)),
            NodeRef::Internal(id) => NodeRef::Internal(self.split_internal(id)),
        }
    }

    /// The right half of the entries moves to a new leaf spliced into the
    /// chain directly after the original.
    fn split_leaf(&mut self, id: NodeId) -> NodeId {
        let (right, old_next) = {
            let leaf = self.leaf_mut(id);
            let mid = leaf.keys.len() / 2;
            let old_next = leaf.next;
            (
                LeafNode {
                    keys: leaf.keys.split_off(mid),
                    values: leaf.values.split_off(mid),
                    parent: leaf.parent,
                    prev: id,
                    next: old_next,
                },
                old_next,
            )
        };
        let right_id = self.leaf_arena.allocate(right);
        self.leaf_mut(id).next = right_id;
        if old_next != NULL_NODE {
            self.leaf_mut(old_next).prev = right_id;
        }
        right_id
    }

    /// The right half of the (key, child) pairs moves to a new internal
    /// sibling; relocated children are re-parented onto it.
    fn split_internal(&mut self, id: NodeId) -> NodeId {
        let right = {
            let node = self.internal_mut(id);
            let mid = node.children.len() / 2;
            InternalNode {
                keys: node.keys.split_off(mid),
                children: node.children.split_off(mid),
                parent: node.parent,
            }
        };
        let moved = right.children.clone();
        let right_id = self.internal_arena.allocate(right);
        for child in moved {
            self.set_parent(child, right_id);
        }
        right_id
    }
}
