//! Bidirectional one-to-many record index.
//!
//! The storage primitive under every relation: a forward map
//! (parent -> children) and a reverse map (child -> parents) kept mutually
//! consistent. Both maps are persistent, so cloning an index or handing out
//! one of its sets is O(1).

use reftree_foundation::{RecordRef, RecordSet};

/// Bidirectional parent/child index over record references.
///
/// Invariant: `child ∈ forward[parent] ⇔ parent ∈ reverse[child]`. Empty
/// sets are never stored, so [`heads`](Self::heads) only yields records that
/// actually have children.
#[derive(Clone, Debug, Default)]
pub struct RelationIndex {
    forward: im::HashMap<RecordRef, RecordSet>,
    reverse: im::HashMap<RecordRef, RecordSet>,
    len: usize,
}

impl RelationIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `parent -> child`. Returns true if the pair was new.
    pub fn add_forward(&mut self, parent: RecordRef, child: RecordRef) -> bool {
        if !self.forward.entry(parent).or_default().insert(child) {
            return false;
        }
        self.reverse.entry(child).or_default().insert(parent);
        self.len += 1;
        true
    }

    /// Removes `parent -> child`. Returns true if the pair was present.
    pub fn remove_forward(&mut self, parent: RecordRef, child: RecordRef) -> bool {
        if !Self::remove_from(&mut self.forward, parent, &child) {
            return false;
        }
        Self::remove_from(&mut self.reverse, child, &parent);
        self.len -= 1;
        true
    }

    fn remove_from(
        map: &mut im::HashMap<RecordRef, RecordSet>,
        key: RecordRef,
        value: &RecordRef,
    ) -> bool {
        let Some(set) = map.get_mut(&key) else {
            return false;
        };
        let removed = set.remove(value);
        if set.is_empty() {
            map.remove(&key);
        }
        removed
    }

    /// Children of `record`. Empty if it has none.
    #[must_use]
    pub fn forward_set(&self, record: RecordRef) -> RecordSet {
        self.forward.get(&record).cloned().unwrap_or_default()
    }

    /// Parents of `record`. Empty if it has none.
    #[must_use]
    pub fn reverse_set(&self, record: RecordRef) -> RecordSet {
        self.reverse.get(&record).cloned().unwrap_or_default()
    }

    /// Checks whether `parent -> child` is present.
    #[must_use]
    pub fn contains(&self, parent: RecordRef, child: RecordRef) -> bool {
        self.forward
            .get(&parent)
            .is_some_and(|children| children.contains(&child))
    }

    /// Returns true if the record appears on either side of any pair.
    #[must_use]
    pub fn touches(&self, record: RecordRef) -> bool {
        self.forward.contains_key(&record) || self.reverse.contains_key(&record)
    }

    /// Iterates over every record that has at least one child.
    pub fn heads(&self) -> impl Iterator<Item = RecordRef> + '_ {
        self.forward.keys().copied()
    }

    /// Iterates over every `(parent, child)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (RecordRef, RecordRef)> + '_ {
        self.forward
            .iter()
            .flat_map(|(parent, children)| children.iter().map(move |child| (*parent, *child)))
    }

    /// Removes every pair touching `record`, in either role.
    ///
    /// Returns the removed `(parent, child)` pairs.
    pub fn remove_record(&mut self, record: RecordRef) -> Vec<(RecordRef, RecordRef)> {
        let mut removed = Vec::new();
        for child in self.forward_set(record).sorted() {
            if self.remove_forward(record, child) {
                removed.push((record, child));
            }
        }
        for parent in self.reverse_set(record).sorted() {
            if self.remove_forward(parent, record) {
                removed.push((parent, record));
            }
        }
        removed
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
        self.len = 0;
    }
}
