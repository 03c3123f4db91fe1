//! A B+ tree multimap with arena-based node storage.
//!
//! Unlike a map, repeated inserts of an existing key do not overwrite: each
//! insert stacks another entry under that key, and `search` and `delete`
//! observe the most recently inserted one first. Duplicates are stored
//! inline in the ordinary leaves, with no dedicated overflow pages; internal
//! nodes use nullable index keys to route around runs of equal keys that
//! span subtree boundaries.
//!
//! # Examples
//!
//! ```
//! use bplusmulti::BPlusMultiMap;
//!
//! let mut tree = BPlusMultiMap::new(16).unwrap();
//! tree.insert("event", 1);
//! tree.insert("event", 2);
//!
//! assert_eq!(tree.search(&"event"), Some(&2));
//! assert_eq!(tree.delete(&"event"), Some(2));
//! assert_eq!(tree.delete(&"event"), Some(1));
//! assert!(tree.is_empty());
//! ```

mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod index_keys;
mod insert_operations;
mod iteration;
mod node;
mod node_arena;
mod types;
mod validation;

pub use construction::DEFAULT_ORDER;
pub use error::{InitResult, TreeError, TreeResult};
pub use iteration::{ItemIterator, KeyIterator, ValueIterator};
pub use node_arena::ArenaStats;
pub use types::{BPlusMultiMap, NodeId, NULL_NODE};

impl<K, V> BPlusMultiMap<K, V> {
    /// Total number of stored entries, duplicates included. Walks the leaf
    /// chain, so this is O(number of leaves).
    pub fn len(&self) -> usize {
        let mut total = 0;
        let mut id = match self.first_leaf_id() {
            Some(id) => id,
            None => return 0,
        };
        loop {
            let leaf = self.leaf(id);
            total += leaf.keys.len();
            if leaf.next == NULL_NODE {
                break;
            }
            id = leaf.next;
        }
        total
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of leaves in the chain.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut id = match self.first_leaf_id() {
            Some(id) => id,
            None => return 0,
        };
        loop {
            count += 1;
            let leaf = self.leaf(id);
            if leaf.next == NULL_NODE {
                break;
            }
            id = leaf.next;
        }
        count
    }

    /// The smallest-key entry, newest first among duplicates.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.items().next()
    }

    /// The largest-key entry, oldest among its duplicates.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.items().last()
    }

    /// Occupancy statistics of the leaf arena.
    pub fn leaf_arena_stats(&self) -> ArenaStats {
        self.leaf_arena.stats()
    }

    /// Occupancy statistics of the internal-node arena.
    pub fn internal_arena_stats(&self) -> ArenaStats {
        self.internal_arena.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_counts_duplicates() {
        let mut tree = BPlusMultiMap::new(3).unwrap();
        assert_eq!(tree.len(), 0);
        tree.insert(1, 10);
        tree.insert(1, 11);
        tree.insert(2, 20);
        assert_eq!(tree.len(), 3);
        tree.delete(&1);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_first_and_last() {
        let mut tree = BPlusMultiMap::new(4).unwrap();
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);

        tree.insert(5, "e");
        tree.insert(1, "a");
        tree.insert(1, "a2");
        tree.insert(9, "i");

        assert_eq!(tree.first(), Some((&1, &"a2")));
        assert_eq!(tree.last(), Some((&9, &"i")));
    }

    #[test]
    fn test_arena_stats_track_merges() {
        let mut tree = BPlusMultiMap::new(3).unwrap();
        for i in 0..20 {
            tree.insert(i, i);
        }
        let grown = tree.leaf_arena_stats().allocated_count;
        assert!(grown > 1);

        for i in 0..20 {
            tree.delete(&i);
        }
        assert_eq!(tree.leaf_arena_stats().allocated_count, 0);
        assert!(tree.leaf_arena_stats().free_count >= grown);
    }
}
