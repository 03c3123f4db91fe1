//! Lookup operations: locating the leaf that owns a key, and `search`.
//!
//! Tree descent alone only lands *near* a key: a duplicate run can span
//! subtree boundaries, so the locate step finishes by walking forward along
//! the leaf chain until it reaches the leaf whose last key is not below the
//! target. Arena accessors for the mutation modules also live here.

use crate::types::{BPlusMultiMap, InternalNode, LeafNode, NodeId, NodeRef, NULL_NODE};

impl<K, V> BPlusMultiMap<K, V> {
    // ========================================================================
    // ARENA ACCESS
    // ========================================================================

    /// Leaf by ID. A dangling ID is a programming error and fails loudly.
    pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        self.leaf_arena.get(id).expect("dangling leaf id")
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        self.leaf_arena.get_mut(id).expect("dangling leaf id")
    }

    /// Internal node by ID. A dangling ID is a programming error.
    pub(crate) fn internal(&self, id: NodeId) -> &InternalNode<K> {
        self.internal_arena.get(id).expect("dangling internal id")
    }

    pub(crate) fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode<K> {
        self.internal_arena.get_mut(id).expect("dangling internal id")
    }

    /// Fallible leaf access for iteration and validation.
    pub(crate) fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    /// ID of the first (leftmost) leaf, the head of the sorted chain.
    pub(crate) fn first_leaf_id(&self) -> Option<NodeId> {
        let mut node = self.root?;
        loop {
            match node {
                NodeRef::Leaf(id) => return Some(id),
                NodeRef::Internal(id) => node = self.internal(id).children[0],
            }
        }
    }
}

impl<K: Ord + Clone, V> BPlusMultiMap<K, V> {
    // ========================================================================
    // PUBLIC LOOKUP OPERATIONS
    // ========================================================================

    /// Look up a key, returning the most recently inserted value stored
    /// under it.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusmulti::BPlusMultiMap;
    ///
    /// let mut tree = BPlusMultiMap::new(4).unwrap();
    /// tree.insert(1, "one");
    /// tree.insert(1, "newer one");
    /// assert_eq!(tree.search(&1), Some(&"newer one"));
    /// assert_eq!(tree.search(&2), None);
    /// ```
    pub fn search(&self, key: &K) -> Option<&V> {
        self.root?;
        let leaf_id = self.locate_leaf(key);
        let leaf = self.leaf(leaf_id);
        let slot = leaf.run_start(key);
        if slot < leaf.len() && leaf.keys[slot] == *key {
            Some(&leaf.values[slot])
        } else {
            None
        }
    }

    /// Check whether at least one entry is stored under `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    // ========================================================================
    // LOCATE
    // ========================================================================

    /// Find the leaf owning `key`: descend by index keys, then walk forward
    /// across the chain while the target is greater than the current leaf's
    /// last key. Callers must ensure the tree is non-empty.
    pub(crate) fn locate_leaf(&self, key: &K) -> NodeId {
        let mut node = self.root.expect("locate_leaf called on empty tree");
        loop {
            match node {
                NodeRef::Internal(id) => node = self.internal(id).route_child(key),
                NodeRef::Leaf(mut leaf_id) => {
                    loop {
                        let leaf = self.leaf(leaf_id);
                        match leaf.keys.last() {
                            Some(last) if *key > *last && leaf.next != NULL_NODE => {
                                leaf_id = leaf.next;
                            }
                            _ => return leaf_id,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_empty_tree() {
        let tree: BPlusMultiMap<i32, i32> = BPlusMultiMap::new(3).unwrap();
        assert_eq!(tree.search(&1), None);
        assert!(!tree.contains_key(&1));
    }

    #[test]
    fn test_search_single_leaf() {
        let mut tree = BPlusMultiMap::new(4).unwrap();
        tree.insert(2, "two");
        tree.insert(1, "one");
        tree.insert(3, "three");

        assert_eq!(tree.search(&1), Some(&"one"));
        assert_eq!(tree.search(&2), Some(&"two"));
        assert_eq!(tree.search(&3), Some(&"three"));
        assert_eq!(tree.search(&4), None);
        assert!(tree.contains_key(&2));
        assert!(!tree.contains_key(&0));
    }

    #[test]
    fn test_search_after_splits() {
        let mut tree = BPlusMultiMap::new(3).unwrap();
        for i in 0..50 {
            tree.insert(i, i * 100);
        }
        for i in 0..50 {
            assert_eq!(tree.search(&i), Some(&(i * 100)));
        }
        assert_eq!(tree.search(&50), None);
        assert_eq!(tree.search(&-1), None);
    }

    #[test]
    fn test_search_duplicate_run_spanning_leaves() {
        // Order 3 leaves hold at most two entries, so eight equal keys span
        // several leaves and exercise the forward walk in locate.
        let mut tree = BPlusMultiMap::new(3).unwrap();
        for v in 1..=8 {
            tree.insert(42, v);
        }
        assert_eq!(tree.search(&42), Some(&8));
        assert_eq!(tree.search(&41), None);
        assert_eq!(tree.search(&43), None);
    }

    #[test]
    fn test_locate_leaf_walks_forward_over_duplicates() {
        let mut tree = BPlusMultiMap::new(3).unwrap();
        for v in 1..=6 {
            tree.insert(5, v);
        }
        tree.insert(9, 90);

        // The leaf owning 9 must not be an all-fives continuation leaf.
        let id = tree.locate_leaf(&9);
        let leaf = tree.leaf(id);
        assert!(leaf.keys.contains(&9));
    }
}
