//! Seams to the UI layer.
//!
//! The projection never interprets what the UI renders. A [`RowFactory`]
//! turns a record into an opaque row payload and supplies the sort key that
//! orders siblings; a [`TreeObserver`] hears when records enter or leave the
//! tree and when a parent is left without children.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use reftree_foundation::RecordRef;

/// Identifier of one tree projection, unique within the process.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree#{}", self.0)
    }
}

/// Produces row payloads and sort keys for records.
pub trait RowFactory {
    /// Opaque per-row payload stored alongside each row.
    type Row: 'static;
    /// Sibling ordering key.
    type Key: Ord + 'static;

    /// Creates the payload for a new row of `record` in tree `tree`.
    fn create_row(&mut self, record: RecordRef, tree: TreeId) -> Self::Row;

    /// The key `record` is sorted by among its siblings.
    fn sort_key(&self, record: RecordRef) -> Self::Key;
}

/// Notifications about records entering and leaving a projection.
///
/// Hooks run while the projection is mid-update and must not call back into
/// it or into the record graph; queue follow-up work instead.
pub trait TreeObserver {
    /// `record` got its first row.
    fn record_shown(&mut self, _record: RecordRef) {}

    /// `record` lost its last row.
    fn record_hidden(&mut self, _record: RecordRef) {}

    /// A removal left every row of `record` without children; the caller may
    /// decide to prune or re-home it.
    fn children_vacated(&mut self, _record: RecordRef) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl TreeObserver for NoObserver {}
