//! Structural invariant checking and debug rendering.
//!
//! `check_invariants_detailed` verifies everything the tree relies on:
//! occupancy bounds, sorted keys, equal leaf depths, parent back-references,
//! leaf chain integrity, index-key agreement between every parent slot and
//! its child, and arena bookkeeping. Tests call it after every mutation.

use std::fmt::Debug;

use crate::types::{BPlusMultiMap, NodeRef, NULL_NODE};

impl<K: Ord + Clone, V> BPlusMultiMap<K, V> {
    /// Quick boolean form of [`check_invariants_detailed`].
    ///
    /// [`check_invariants_detailed`]: BPlusMultiMap::check_invariants_detailed
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Verify all structural invariants, reporting the first violation.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        let Some(root) = self.root else {
            if !self.leaf_arena.is_empty() || !self.internal_arena.is_empty() {
                return Err("empty tree holds allocated nodes".to_string());
            }
            return Ok(());
        };
        if self.parent_id(root) != NULL_NODE {
            return Err("root has a parent reference".to_string());
        }

        let mut leaf_depth = None;
        let mut leaf_tally = 0;
        let mut internal_tally = 0;
        self.check_node(root, 0, &mut leaf_depth, &mut leaf_tally, &mut internal_tally)?;
        self.check_leaf_chain(leaf_tally)?;

        if leaf_tally != self.leaf_arena.allocated_count() {
            return Err(format!(
                "leaf arena holds {} nodes but the tree reaches {}",
                self.leaf_arena.allocated_count(),
                leaf_tally
            ));
        }
        if internal_tally != self.internal_arena.allocated_count() {
            return Err(format!(
                "internal arena holds {} nodes but the tree reaches {}",
                self.internal_arena.allocated_count(),
                internal_tally
            ));
        }
        Ok(())
    }

    fn check_node(
        &self,
        node: NodeRef,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        leaf_tally: &mut usize,
        internal_tally: &mut usize,
    ) -> Result<(), String> {
        if self.is_underflowing(node) {
            return Err(format!("underflowing node {} at depth {}", node.id(), depth));
        }
        if self.is_overflowing(node) {
            return Err(format!("overflowing node {} at depth {}", node.id(), depth));
        }
        match node {
            NodeRef::Leaf(id) => {
                *leaf_tally += 1;
                let leaf = self.leaf(id);
                if leaf.keys.len() != leaf.values.len() {
                    return Err(format!("leaf {} has mismatched key/value counts", id));
                }
                if leaf.keys.windows(2).any(|w| w[0] > w[1]) {
                    return Err(format!("leaf {} keys are not sorted", id));
                }
                match *leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(format!(
                            "leaf {} at depth {} but earlier leaves at {}",
                            id, depth, expected
                        ));
                    }
                    Some(_) => {}
                }
            }
            NodeRef::Internal(id) => {
                *internal_tally += 1;
                let internal = self.internal(id);
                if internal.keys.len() != internal.children.len() {
                    return Err(format!("internal {} has mismatched key/child counts", id));
                }
                // Non-null index keys must be strictly increasing left to
                // right; null continuation slots sit between them freely.
                let mut prev_key: Option<&K> = None;
                for key in internal.keys.iter().flatten() {
                    if let Some(prev) = prev_key {
                        if prev >= key {
                            return Err(format!(
                                "internal {} index keys are not strictly increasing",
                                id
                            ));
                        }
                    }
                    prev_key = Some(key);
                }
                for (slot, &child) in internal.children.iter().enumerate() {
                    if self.parent_id(child) != id {
                        return Err(format!(
                            "child in slot {} of internal {} has a stale parent reference",
                            slot, id
                        ));
                    }
                    if internal.keys[slot] != self.index_key(child) {
                        return Err(format!(
                            "slot {} of internal {} disagrees with its child's index key",
                            slot, id
                        ));
                    }
                    self.check_node(child, depth + 1, leaf_depth, leaf_tally, internal_tally)?;
                }
            }
        }
        Ok(())
    }

    /// The chain must start at the leftmost leaf, link symmetrically, keep
    /// keys globally non-decreasing, and visit every leaf exactly once.
    fn check_leaf_chain(&self, expected_leaves: usize) -> Result<(), String> {
        let Some(first) = self.first_leaf_id() else {
            return Ok(());
        };
        if self.leaf(first).prev != NULL_NODE {
            return Err("leftmost leaf has a prev link".to_string());
        }

        let mut visited = 0;
        let mut id = first;
        let mut prev_key: Option<&K> = None;
        loop {
            visited += 1;
            let leaf = self.leaf(id);
            for key in &leaf.keys {
                if let Some(prev) = prev_key {
                    if prev > key {
                        return Err(format!("leaf chain out of order at leaf {}", id));
                    }
                }
                prev_key = Some(key);
            }
            let next = leaf.next;
            if next == NULL_NODE {
                break;
            }
            if self.leaf(next).prev != id {
                return Err(format!("asymmetric chain link between {} and {}", id, next));
            }
            id = next;
        }
        if visited != expected_leaves {
            return Err(format!(
                "chain visits {} leaves but the tree holds {}",
                visited, expected_leaves
            ));
        }
        Ok(())
    }

    /// Entry counts of the chained leaves, left to right.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut id = match self.first_leaf_id() {
            Some(id) => id,
            None => return sizes,
        };
        loop {
            let leaf = self.leaf(id);
            sizes.push(leaf.len());
            if leaf.next == NULL_NODE {
                break;
            }
            id = leaf.next;
        }
        sizes
    }
}

impl<K: Ord + Clone + Debug, V> BPlusMultiMap<K, V> {
    /// Render the tree one line per level for debugging, `#` marking null
    /// index-key slots.
    pub fn render_levels(&self) -> String {
        let Some(root) = self.root else {
            return "Empty".to_string();
        };
        let mut lines = Vec::new();
        let mut level = vec![root];
        while !level.is_empty() {
            let mut parts = Vec::new();
            let mut next_level: Vec<NodeRef> = Vec::new();
            for node in &level {
                match *node {
                    NodeRef::Leaf(id) => {
                        parts.push(format!("{:?}", self.leaf(id).keys));
                    }
                    NodeRef::Internal(id) => {
                        let internal = self.internal(id);
                        let slots: Vec<String> = internal
                            .keys
                            .iter()
                            .map(|key| match key {
                                Some(k) => format!("{:?}", k),
                                None => "#".to_string(),
                            })
                            .collect();
                        parts.push(format!("[{}]", slots.join(", ")));
                        next_level.extend(internal.children.iter().copied());
                    }
                }
            }
            lines.push(parts.join(" "));
            level = next_level;
        }
        lines.join("\n")
    }
}
