//! Slab-style arena for tree nodes.
//!
//! Nodes are addressed by stable `u32` ids, so parent back-references and
//! the leaf chain can be plain ids instead of owning pointers. Slots freed
//! by merges and root collapse go onto a free list and are reused by later
//! splits.

use crate::types::{NodeId, NULL_NODE};

/// Occupancy statistics for an arena.
#[derive(Debug, Clone, Copy)]
pub struct ArenaStats {
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
}

/// Arena allocator backing one node kind.
#[derive(Debug)]
pub struct NodeArena<T> {
    storage: Vec<T>,
    free_list: Vec<usize>,
    /// Tracks which slots are live; freed slots keep a default placeholder.
    allocated: Vec<bool>,
}

impl<T> NodeArena<T> {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated: Vec::new(),
        }
    }

    /// Allocate an item and return its ID, reusing a free slot if possible.
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = item;
            self.allocated[free_index] = true;
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(item);
            self.allocated.push(true);
            index
        };
        NodeId::try_from(index).expect("arena index should fit in NodeId")
    }

    /// Deallocate an item and return it, replacing the slot with a default
    /// placeholder. Returns `None` for `NULL_NODE` or an unallocated slot.
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if !self.allocated.get(index).copied().unwrap_or(false) {
            return None;
        }
        self.allocated[index] = false;
        self.free_list.push(index);
        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Get a reference to an item in the arena.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if self.allocated.get(index).copied().unwrap_or(false) {
            Some(&self.storage[index])
        } else {
            None
        }
    }

    /// Get a mutable reference to an item in the arena.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if self.allocated.get(index).copied().unwrap_or(false) {
            Some(&mut self.storage[index])
        } else {
            None
        }
    }

    /// Check whether an ID refers to an allocated slot.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of allocated items.
    pub fn allocated_count(&self) -> usize {
        self.allocated.iter().filter(|&&live| live).count()
    }

    /// Number of free (reusable) slots.
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Returns true if no items are allocated.
    pub fn is_empty(&self) -> bool {
        self.allocated_count() == 0
    }

    /// Drop all items and reset the arena.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.allocated.clear();
        self.free_list.clear();
    }

    /// Occupancy statistics.
    pub fn stats(&self) -> ArenaStats {
        let allocated_count = self.allocated_count();
        let free_count = self.free_count();
        let total = allocated_count + free_count;
        let utilization = if total > 0 {
            allocated_count as f64 / total as f64
        } else {
            0.0
        };
        ArenaStats {
            allocated_count,
            free_count,
            utilization,
        }
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
