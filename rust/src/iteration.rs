//! Iteration over the leaf chain.
//!
//! All iterators walk the chained leaves from the leftmost one, so they
//! yield entries in key order; within a duplicate run, the most recently
//! inserted entry comes first.

use crate::types::{BPlusMultiMap, LeafNode, NodeId, NULL_NODE};

/// Iterator over `(key, value)` pairs in key order.
pub struct ItemIterator<'a, K, V> {
    tree: &'a BPlusMultiMap<K, V>,
    current_leaf: Option<&'a LeafNode<K, V>>,
    index: usize,
}

impl<'a, K, V> ItemIterator<'a, K, V> {
    pub(crate) fn new(tree: &'a BPlusMultiMap<K, V>) -> Self {
        let current_leaf = tree.first_leaf_id().and_then(|id| tree.get_leaf(id));
        Self {
            tree,
            current_leaf,
            index: 0,
        }
    }

    fn advance_leaf(&mut self, next: NodeId) {
        self.current_leaf = if next == NULL_NODE {
            None
        } else {
            self.tree.get_leaf(next)
        };
        self.index = 0;
    }
}

impl<'a, K, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf?;
            if self.index < leaf.keys.len() {
                let item = (&leaf.keys[self.index], &leaf.values[self.index]);
                self.index += 1;
                return Some(item);
            }
            self.advance_leaf(leaf.next);
        }
    }
}

/// Iterator over keys in order, duplicates included.
pub struct KeyIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

impl<'a, K, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }
}

/// Iterator over values in key order.
pub struct ValueIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

impl<'a, K, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }
}

impl<K, V> BPlusMultiMap<K, V> {
    /// Iterate over all entries in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusmulti::BPlusMultiMap;
    ///
    /// let mut tree = BPlusMultiMap::new(4).unwrap();
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(1, "a2");
    ///
    /// let items: Vec<_> = tree.items().collect();
    /// assert_eq!(items, vec![(&1, &"a2"), (&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn items(&self) -> ItemIterator<'_, K, V> {
        ItemIterator::new(self)
    }

    /// Iterate over all keys in order, duplicates included.
    pub fn keys(&self) -> KeyIterator<'_, K, V> {
        KeyIterator { items: self.items() }
    }

    /// Iterate over all values in key order.
    pub fn values(&self) -> ValueIterator<'_, K, V> {
        ValueIterator { items: self.items() }
    }
}
