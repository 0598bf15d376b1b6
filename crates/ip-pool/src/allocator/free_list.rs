//! Ordered set of released host offsets
//!
//! Backed by a BTreeSet so insert, lookup, delete and max retrieval are all
//! O(log n).

use crate::{Error, Result};
use std::collections::BTreeSet;

/// Released host offsets awaiting reuse
#[derive(Debug, Clone, Default)]
pub struct FreeList {
    offsets: BTreeSet<u64>,
}

impl FreeList {
    /// Create an empty free list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an offset, failing if it is already present
    pub fn insert(&mut self, offset: u64) -> Result<()> {
        if !self.offsets.insert(offset) {
            return Err(Error::DuplicateOffset(offset));
        }
        Ok(())
    }

    /// Check if an offset is present
    pub fn contains(&self, offset: u64) -> bool {
        self.offsets.contains(&offset)
    }

    /// Remove an offset; absent offsets are ignored
    pub fn delete(&mut self, offset: u64) {
        self.offsets.remove(&offset);
    }

    /// Greatest offset, if any
    pub fn max(&self) -> Option<u64> {
        self.offsets.last().copied()
    }

    /// Remove and return the greatest offset
    pub fn pop_max(&mut self) -> Option<u64> {
        self.offsets.pop_last()
    }

    /// Number of offsets held
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the list holds no offsets
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offsets in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.offsets.iter().copied()
    }
}
