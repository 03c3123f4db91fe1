//! Delete and underflow resolution.
//!
//! A delete removes the front entry of the key's duplicate run (the most
//! recently inserted one), refreshes index keys — including the successor
//! leaf's when the removed entry was this leaf's last key, since its
//! continuation relationship may have changed — and then repairs underflow.
//! Borrowing from a sibling is count-preserving and ends the cascade;
//! merging shrinks the parent and can cascade to the root, where the tree
//! shrinks by collapsing the root or becomes empty.

use crate::types::{BPlusMultiMap, NodeId, NodeRef, NULL_NODE};

impl<K: Ord + Clone, V> BPlusMultiMap<K, V> {
    /// Remove and return the most recently inserted entry stored under
    /// `key`, or `None` if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusmulti::BPlusMultiMap;
    ///
    /// let mut tree = BPlusMultiMap::new(4).unwrap();
    /// tree.insert(1, "a");
    /// tree.insert(1, "b");
    /// assert_eq!(tree.delete(&1), Some("b"));
    /// assert_eq!(tree.delete(&1), Some("a"));
    /// assert_eq!(tree.delete(&1), None);
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.root?;
        let leaf_id = self.locate_leaf(key);
        let (slot, removed_last) = {
            let leaf = self.leaf(leaf_id);
            let slot = leaf.run_start(key);
            if slot >= leaf.len() || leaf.keys[slot] != *key {
                return None;
            }
            (slot, slot + 1 == leaf.len() && leaf.next != NULL_NODE)
        };
        let value = {
            let leaf = self.leaf_mut(leaf_id);
            leaf.keys.remove(slot);
            leaf.values.remove(slot)
        };
        self.refresh_index_keys_after_delete(leaf_id, removed_last);
        self.resolve_underflow(NodeRef::Leaf(leaf_id));
        Some(value)
    }

    /// Refresh the mutated leaf's index key and, when the removed entry was
    /// the leaf's last key, the successor leaf's as well; propagate each
    /// change upward to its fixed point (once, if both share a parent).
    fn refresh_index_keys_after_delete(&mut self, leaf_id: NodeId, update_next: bool) {
        let mut propagate_from = None;
        let mut next_propagate_from = None;

        if self.update_index_key(NodeRef::Leaf(leaf_id)) {
            propagate_from = Some(self.leaf(leaf_id).parent);
        }
        if update_next {
            let next_id = self.leaf(leaf_id).next;
            if next_id != NULL_NODE && self.update_index_key(NodeRef::Leaf(next_id)) {
                next_propagate_from = Some(self.leaf(next_id).parent);
            }
        }
        if let Some(parent) = propagate_from {
            self.propagate_index_key_update(NodeRef::Internal(parent));
        }
        if let Some(parent) = next_propagate_from {
            if next_propagate_from != propagate_from {
                self.propagate_index_key_update(NodeRef::Internal(parent));
            }
        }
    }

    // ========================================================================
    // UNDERFLOW RESOLUTION
    // ========================================================================

    /// Repair underflowing nodes from the mutation point toward the root:
    /// borrow from a sibling with surplus, else merge with one. A borrow
    /// ends the cascade; a merge shrinks the parent and re-checks it.
    pub(crate) fn resolve_underflow(&mut self, mut node: NodeRef) {
        while self.is_underflowing(node) {
            let parent = self.parent_id(node);
            if parent == NULL_NODE {
                self.collapse_root(node);
                break;
            }
            let (_, slot) = self
                .position_in_parent(node)
                .expect("non-root node has a parent slot");
            let children = &self.internal(parent).children;
            let left_sibling = (slot > 0).then(|| children[slot - 1]);
            let right_sibling = children.get(slot + 1).copied();

            if let Some(left) = left_sibling {
                if self.can_lend(left) {
                    self.lend_from_left(left, node);
                    break;
                }
            }
            if let Some(right) = right_sibling {
                if self.can_lend(right) {
                    self.lend_from_right(node, right);
                    break;
                }
            }
            // No sibling has surplus: the left sibling absorbs this node,
            // or this node absorbs its right sibling if it is leftmost.
            self.merge_right_into(left_sibling.unwrap_or(node));
            node = NodeRef::Internal(parent);
        }
    }

    /// Root repair: an internal root left with a single child hands the
    /// root over to it; an emptied root leaf leaves the tree empty.
    fn collapse_root(&mut self, node: NodeRef) {
        match node {
            NodeRef::Internal(id) => {
                let child = self.internal(id).children[0];
                self.set_parent(child, NULL_NODE);
                self.internal_arena.deallocate(id);
                self.root = Some(child);
            }
            NodeRef::Leaf(id) => {
                self.leaf_arena.deallocate(id);
                self.root = None;
            }
        }
    }

    /// Move the left sibling's last entry/child to the front of the
    /// underflowing right node, then refresh both index keys locally.
    fn lend_from_left(&mut self, left: NodeRef, right: NodeRef) {
        match (left, right) {
            (NodeRef::Leaf(l), NodeRef::Leaf(r)) => {
                let (key, value) = {
                    let leaf = self.leaf_mut(l);
                    let key = leaf.keys.pop().expect("lender leaf is not empty");
                    let value = leaf.values.pop().expect("lender leaf is not empty");
                    (key, value)
                };
                let leaf = self.leaf_mut(r);
                leaf.keys.insert(0, key);
                leaf.values.insert(0, value);
            }
            (NodeRef::Internal(l), NodeRef::Internal(r)) => {
                let (key, child) = {
                    let node = self.internal_mut(l);
                    let key = node.keys.pop().expect("lender node is not empty");
                    let child = node.children.pop().expect("lender node is not empty");
                    (key, child)
                };
                let node = self.internal_mut(r);
                node.keys.insert(0, key);
                node.children.insert(0, child);
                self.set_parent(child, r);
            }
            _ => unreachable!("siblings are the same node kind"),
        }
        self.update_index_key(left);
        self.update_index_key(right);
    }

    /// Move the right sibling's first entry/child to the end of the
    /// underflowing left node, then refresh both index keys locally.
    fn lend_from_right(&mut self, left: NodeRef, right: NodeRef) {
        match (left, right) {
            (NodeRef::Leaf(l), NodeRef::Leaf(r)) => {
                let (key, value) = {
                    let leaf = self.leaf_mut(r);
                    (leaf.keys.remove(0), leaf.values.remove(0))
                };
                let leaf = self.leaf_mut(l);
                leaf.keys.push(key);
                leaf.values.push(value);
            }
            (NodeRef::Internal(l), NodeRef::Internal(r)) => {
                let (key, child) = {
                    let node = self.internal_mut(r);
                    (node.keys.remove(0), node.children.remove(0))
                };
                let node = self.internal_mut(l);
                node.keys.push(key);
                node.children.push(child);
                self.set_parent(child, l);
            }
            _ => unreachable!("siblings are the same node kind"),
        }
        self.update_index_key(left);
        self.update_index_key(right);
    }

    /// Merge: `left` absorbs its right sibling, whose parent slot is
    /// discarded and whose arena slot is freed. Leaves re-splice the chain;
    /// internal nodes re-parent the absorbed children.
    fn merge_right_into(&mut self, left: NodeRef) {
        let (parent, slot) = self
            .position_in_parent(left)
            .expect("merge requires a parent");
        let right = {
            let parent_node = self.internal_mut(parent);
            parent_node.keys.remove(slot + 1);
            parent_node.children.remove(slot + 1)
        };
        match (left, right) {
            (NodeRef::Leaf(l), NodeRef::Leaf(r)) => {
                let mut donor = self
                    .leaf_arena
                    .deallocate(r)
                    .expect("merge donor is allocated");
                let donor_next = donor.next;
                {
                    let leaf = self.leaf_mut(l);
                    leaf.keys.append(&mut donor.keys);
                    leaf.values.append(&mut donor.values);
                    leaf.next = donor_next;
                }
                if donor_next != NULL_NODE {
                    self.leaf_mut(donor_next).prev = l;
                }
            }
            (NodeRef::Internal(l), NodeRef::Internal(r)) => {
                let mut donor = self
                    .internal_arena
                    .deallocate(r)
                    .expect("merge donor is allocated");
                let moved = donor.children.clone();
                {
                    let node = self.internal_mut(l);
                    node.keys.append(&mut donor.keys);
                    node.children.append(&mut donor.children);
                }
                for child in moved {
                    self.set_parent(child, l);
                }
            }
            _ => unreachable!("siblings are the same node kind"),
        }
        self.update_index_key(left);
    }
}
