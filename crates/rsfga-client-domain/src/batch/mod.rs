//! Splitting change sets into chunks the service accepts in one call.
//!
//! The change set is viewed as the concatenation `writes ++ deletes` and cut
//! into consecutive windows of at most `max_per_chunk` tuples. Each window
//! therefore maps to one contiguous slice of the writes and one contiguous
//! slice of the deletes, which keeps both sequences in order and lets chunks
//! borrow from the change set instead of copying it.

use std::num::NonZeroUsize;

use crate::error::{DomainError, DomainResult};
use crate::model::{Tuple, TupleChangeSet};

#[cfg(test)]
mod batch_proptest;

/// A bounded slice of a change set, sent in a single remote call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'a> {
    index: usize,
    writes: &'a [Tuple],
    deletes: &'a [Tuple],
}

impl<'a> Chunk<'a> {
    /// 0-based position of this chunk within the transaction.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn writes(&self) -> &'a [Tuple] {
        self.writes
    }

    pub fn deletes(&self) -> &'a [Tuple] {
        self.deletes
    }

    /// Number of tuples (writes + deletes) in this chunk.
    pub fn len(&self) -> usize {
        self.writes.len() + self.deletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits change sets according to the service's per-call tuple limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batcher {
    max_per_chunk: NonZeroUsize,
}

impl Batcher {
    /// Maximum tuples per write call accepted by OpenFGA.
    pub const DEFAULT_MAX_PER_CHUNK: usize = 100;

    pub fn new(max_per_chunk: NonZeroUsize) -> Self {
        Self { max_per_chunk }
    }

    /// Creates a batcher from a plain limit, rejecting zero.
    pub fn try_new(max_per_chunk: usize) -> DomainResult<Self> {
        NonZeroUsize::new(max_per_chunk)
            .map(Self::new)
            .ok_or(DomainError::InvalidChunkSize)
    }

    pub fn max_per_chunk(&self) -> usize {
        self.max_per_chunk.get()
    }

    /// Number of chunks `split` produces for the change set.
    pub fn chunk_count(&self, change_set: &TupleChangeSet) -> usize {
        change_set.len().div_ceil(self.max_per_chunk.get())
    }

    /// Splits the change set into ordered chunks.
    ///
    /// An empty change set yields no chunks.
    pub fn split<'a>(&self, change_set: &'a TupleChangeSet) -> Vec<Chunk<'a>> {
        let writes = change_set.writes();
        let deletes = change_set.deletes();
        let total = writes.len() + deletes.len();
        let limit = self.max_per_chunk.get();

        (0..self.chunk_count(change_set))
            .map(|index| {
                let start = index * limit;
                let end = (start + limit).min(total);
                Chunk {
                    index,
                    writes: &writes[start.min(writes.len())..end.min(writes.len())],
                    deletes: &deletes[start.saturating_sub(writes.len())
                        ..end.saturating_sub(writes.len())],
                }
            })
            .collect()
    }
}

impl Default for Batcher {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(Self::DEFAULT_MAX_PER_CHUNK).unwrap_or(NonZeroUsize::MIN))
    }
}
