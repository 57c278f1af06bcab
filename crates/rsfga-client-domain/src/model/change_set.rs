//! The validated set of writes and deletes for one transaction.

use std::collections::HashMap;
use std::fmt;

use super::types::{Tuple, TupleKey};
use crate::error::{DomainError, DomainResult};

/// Which half of a change set a tuple belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeSide {
    Write,
    Delete,
}

impl fmt::Display for ChangeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeSide::Write => f.write_str("write"),
            ChangeSide::Delete => f.write_str("delete"),
        }
    }
}

/// Ordered writes and deletes requested together.
///
/// A change set can only be obtained through [`TupleChangeSet::new`] (or the
/// one-sided constructors), so every instance has well-formed tuples and no
/// tuple key that is both written and deleted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TupleChangeSet {
    writes: Vec<Tuple>,
    deletes: Vec<Tuple>,
}

impl TupleChangeSet {
    /// Creates a change set, validating every tuple and rejecting ambiguous intent.
    pub fn new(writes: Vec<Tuple>, deletes: Vec<Tuple>) -> DomainResult<Self> {
        validate_side(ChangeSide::Write, &writes)?;
        validate_side(ChangeSide::Delete, &deletes)?;

        let mut written: HashMap<TupleKey, usize> = HashMap::with_capacity(writes.len());
        for (index, tuple) in writes.iter().enumerate() {
            written.entry(tuple.key()).or_insert(index);
        }
        for (delete_index, tuple) in deletes.iter().enumerate() {
            let key = tuple.key();
            if let Some(&write_index) = written.get(&key) {
                return Err(DomainError::AmbiguousTuple {
                    tuple: key.to_string(),
                    write_index,
                    delete_index,
                });
            }
        }

        Ok(Self { writes, deletes })
    }

    /// Creates a change set containing only writes.
    pub fn writes_only(writes: Vec<Tuple>) -> DomainResult<Self> {
        Self::new(writes, Vec::new())
    }

    /// Creates a change set containing only deletes.
    pub fn deletes_only(deletes: Vec<Tuple>) -> DomainResult<Self> {
        Self::new(Vec::new(), deletes)
    }

    /// Creates an empty change set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> &[Tuple] {
        &self.writes
    }

    pub fn deletes(&self) -> &[Tuple] {
        &self.deletes
    }

    /// Total number of tuples (writes + deletes).
    pub fn len(&self) -> usize {
        self.writes.len() + self.deletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.deletes.is_empty()
    }
}

fn validate_side(side: ChangeSide, tuples: &[Tuple]) -> DomainResult<()> {
    for (index, tuple) in tuples.iter().enumerate() {
        if let Err(message) = tuple.validate() {
            return Err(DomainError::InvalidTuple {
                side,
                index,
                message: message.to_string(),
            });
        }
        if side == ChangeSide::Delete && tuple.condition.is_some() {
            return Err(DomainError::InvalidTuple {
                side,
                index,
                message: "deletes cannot carry a condition".to_string(),
            });
        }
    }
    Ok(())
}
