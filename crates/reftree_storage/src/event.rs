//! Edge change notifications.
//!
//! A [`RelationSet`](crate::RelationSet) reports what it committed as a list
//! of [`EdgeChange`]s; the [`RecordGraph`](crate::RecordGraph) wraps each one
//! in an [`EdgeEvent`] and hands it to the relation's listeners.

use std::fmt;

use reftree_foundation::RecordRef;

use crate::schema::{RelationId, TreeOrientation};

/// Whether an edge appeared or disappeared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeChangeKind {
    /// The edge was inserted.
    Added,
    /// The edge was removed.
    Removed,
}

/// One committed change to a relation's edge set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeChange {
    /// What happened.
    pub kind: EdgeChangeKind,
    /// Subject of the edge.
    pub subject: RecordRef,
    /// Object of the edge.
    pub object: RecordRef,
}

impl EdgeChange {
    /// An insertion of `subject -> object`.
    #[must_use]
    pub fn added(subject: RecordRef, object: RecordRef) -> Self {
        Self {
            kind: EdgeChangeKind::Added,
            subject,
            object,
        }
    }

    /// A removal of `subject -> object`.
    #[must_use]
    pub fn removed(subject: RecordRef, object: RecordRef) -> Self {
        Self {
            kind: EdgeChangeKind::Removed,
            subject,
            object,
        }
    }
}

/// A change event as delivered to graph listeners.
///
/// Besides the raw subject/object pair, the event knows the relation's tree
/// orientation, so listeners building trees can ask for the
/// `(child, parent, is_addition)` view directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEvent {
    /// Relation the edge belongs to.
    pub relation: RelationId,
    /// The committed change.
    pub change: EdgeChange,
    /// Orientation declared by the relation.
    pub orientation: TreeOrientation,
}

impl EdgeEvent {
    /// Subject of the changed edge.
    #[must_use]
    pub fn subject(&self) -> RecordRef {
        self.change.subject
    }

    /// Object of the changed edge.
    #[must_use]
    pub fn object(&self) -> RecordRef {
        self.change.object
    }

    /// True for insertions, false for removals.
    #[must_use]
    pub fn is_addition(&self) -> bool {
        self.change.kind == EdgeChangeKind::Added
    }

    /// The end that is the child under the relation's orientation.
    #[must_use]
    pub fn child(&self) -> RecordRef {
        self.tree_view(self.orientation).0
    }

    /// The end that is the parent under the relation's orientation.
    #[must_use]
    pub fn parent(&self) -> RecordRef {
        self.tree_view(self.orientation).1
    }

    /// `(child, parent, is_addition)` under an explicit orientation.
    #[must_use]
    pub fn tree_view(&self, orientation: TreeOrientation) -> (RecordRef, RecordRef, bool) {
        let (child, parent) = orientation.child_parent(self.change.subject, self.change.object);
        (child, parent, self.is_addition())
    }
}

impl fmt::Display for EdgeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_addition() { '+' } else { '-' };
        write!(
            f,
            "{sign}{} {} -> {}",
            self.relation, self.change.subject, self.change.object
        )
    }
}

/// Handle returned by [`RecordGraph::subscribe`](crate::RecordGraph::subscribe).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Returned by a listener to say whether it wants further events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerControl {
    /// Keep delivering events.
    Continue,
    /// Remove this listener after the current dispatch.
    Unsubscribe,
}
