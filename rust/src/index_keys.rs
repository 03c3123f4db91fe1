//! Index-key maintenance.
//!
//! Every non-root node has an *index key*: the value its parent must store
//! to route lookups into it. A null index key marks a node that only
//! continues a duplicate run opened to its left, so the parent routes such
//! lookups through the run's opening subtree instead.
//!
//! `update_index_key` rewrites a single parent slot and reports whether it
//! changed; `propagate_index_key_update` repeats that walking upward and
//! stops at the first level that did not change. That fixed-point rule is
//! what bounds maintenance cost after an insert or delete.

use crate::types::{BPlusMultiMap, NodeId, NodeRef, NULL_NODE};

impl<K: Ord + Clone, V> BPlusMultiMap<K, V> {
    /// The key this node's parent should store for it.
    pub(crate) fn index_key(&self, node: NodeRef) -> Option<K> {
        match node {
            NodeRef::Internal(id) => {
                // An internal node forwards the index key of its leftmost
                // novel-key child: the first non-null slot in its own list.
                self.internal(id).keys.iter().flatten().next().cloned()
            }
            NodeRef::Leaf(id) => self.leaf_index_key(id),
        }
    }

    /// Index key of a leaf. The first key qualifies when it is genuinely
    /// new, i.e. the previous leaf is absent, empty, or ends strictly below
    /// it. A leaf opening mid-run instead contributes its first key greater
    /// than the run key, or null when the whole leaf continues the run.
    fn leaf_index_key(&self, id: NodeId) -> Option<K> {
        let leaf = self.leaf(id);
        let first = leaf.keys.first()?;
        let continues_run = leaf.prev != NULL_NODE
            && self
                .leaf(leaf.prev)
                .keys
                .last()
                .is_some_and(|last| last >= first);
        if continues_run {
            leaf.keys.iter().find(|k| *k > first).cloned()
        } else {
            Some(first.clone())
        }
    }

    /// Parent ID and child slot of a node, or `None` for the root.
    pub(crate) fn position_in_parent(&self, node: NodeRef) -> Option<(NodeId, usize)> {
        let parent = self.parent_id(node);
        if parent == NULL_NODE {
            return None;
        }
        let slot = self
            .internal(parent)
            .children
            .iter()
            .position(|child| *child == node)
            .expect("node missing from its parent's child list");
        Some((parent, slot))
    }

    /// Recompute this node's index key and store it at its parent slot.
    /// Returns whether the stored value changed, counting null↔non-null
    /// transitions; values are compared, never identity.
    pub(crate) fn update_index_key(&mut self, node: NodeRef) -> bool {
        let Some((parent, slot)) = self.position_in_parent(node) else {
            return false;
        };
        let computed = self.index_key(node);
        if self.internal(parent).keys[slot] == computed {
            return false;
        }
        self.internal_mut(parent).keys[slot] = computed;
        true
    }

    /// Apply `update_index_key` walking upward until a level reports no
    /// change.
    pub(crate) fn propagate_index_key_update(&mut self, mut node: NodeRef) {
        while self.update_index_key(node) {
            node = NodeRef::Internal(self.parent_id(node));
        }
    }
}
