//! Persistent record sets with structural sharing.
//!
//! A thin wrapper around `im::HashSet`. Relation indices hand these out by
//! value: cloning is O(1), and a caller holding a set keeps a stable
//! snapshot even while the index it came from is mutated.

use std::fmt;
use std::iter::FromIterator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::record::RecordRef;

/// Persistent set of records.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordSet(im::HashSet<RecordRef>);

impl RecordSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(im::HashSet::new())
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the set contains the record.
    #[must_use]
    pub fn contains(&self, record: &RecordRef) -> bool {
        self.0.contains(record)
    }

    /// Inserts a record in place. Returns true if it was not already present.
    pub fn insert(&mut self, record: RecordRef) -> bool {
        self.0.insert(record).is_none()
    }

    /// Removes a record in place. Returns true if it was present.
    pub fn remove(&mut self, record: &RecordRef) -> bool {
        self.0.remove(record).is_some()
    }

    /// Returns an iterator over the records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &RecordRef> {
        self.0.iter()
    }

    /// Returns the records sorted by identity.
    ///
    /// Useful wherever a deterministic visiting order matters.
    #[must_use]
    pub fn sorted(&self) -> Vec<RecordRef> {
        let mut records: Vec<_> = self.0.iter().copied().collect();
        records.sort_unstable();
        records
    }

    /// Returns a new set that is the union of this set and another.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.clone().union(other.0.clone()))
    }

    /// Returns a new set that is the difference of this set and another.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.clone().relative_complement(other.0.clone()))
    }
}

impl fmt::Debug for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.sorted()).finish()
    }
}

impl FromIterator<RecordRef> for RecordSet {
    fn from_iter<I: IntoIterator<Item = RecordRef>>(iter: I) -> Self {
        Self(im::HashSet::from_iter(iter))
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a RecordRef;
    type IntoIter = im::hashset::Iter<'a, RecordRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
