//! Relation type declarations.
//!
//! A [`RelationSchema`] is the immutable descriptor of one family of edges:
//! which record types sit on each end, how many objects a subject may have,
//! whether cycles are forbidden, what nested attribute an edge may carry, and
//! which end is the child when the relation is projected into a tree.

use std::fmt;

use reftree_foundation::{RecordRef, RecordType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dense identifier of a registered relation type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationId(pub(crate) u32);

impl RelationId {
    /// Returns the raw index of this relation.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rel#{}", self.0)
    }
}

/// Schema definition for a relation type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationSchema {
    /// Relation name (e.g. `counter-of-argument`).
    pub name: String,
    /// Record type of every subject.
    pub subject_type: RecordType,
    /// Record type of every object.
    pub object_type: RecordType,
    /// Cardinality constraint.
    pub cardinality: Cardinality,
    /// If true, edges that would close a cycle are rejected.
    pub acyclic: bool,
    /// Kind of nested attribute an edge may carry.
    pub attribute: Option<AttributeKind>,
    /// Which end is the child when projected into a tree.
    pub orientation: TreeOrientation,
}

impl RelationSchema {
    /// Creates a many-objects-per-subject schema with no attribute, cycles
    /// allowed, and the subject as the tree child.
    #[must_use]
    pub fn new(name: impl Into<String>, subject_type: RecordType, object_type: RecordType) -> Self {
        Self {
            name: name.into(),
            subject_type,
            object_type,
            cardinality: Cardinality::ManyObjectsPerSubject,
            acyclic: false,
            attribute: None,
            orientation: TreeOrientation::SubjectIsChild,
        }
    }

    /// Sets the cardinality.
    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Forbids cycles.
    #[must_use]
    pub fn acyclic(mut self) -> Self {
        self.acyclic = true;
        self
    }

    /// Declares the nested attribute kind.
    #[must_use]
    pub fn with_attribute(mut self, kind: AttributeKind) -> Self {
        self.attribute = Some(kind);
        self
    }

    /// Sets the tree orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: TreeOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Returns true if `value` is acceptable as this relation's attribute.
    #[must_use]
    pub fn accepts(&self, value: &Attribute) -> bool {
        match (&self.attribute, value) {
            (Some(AttributeKind::Record(ty)), Attribute::Record(record)) => record.ty == *ty,
            (Some(AttributeKind::Text), Attribute::Text(_)) => true,
            _ => false,
        }
    }

    /// Maps `(subject, object)` to `(child, parent)` for this orientation.
    #[must_use]
    pub fn child_parent(&self, subject: RecordRef, object: RecordRef) -> (RecordRef, RecordRef) {
        self.orientation.child_parent(subject, object)
    }
}

/// Cardinality constraint for relations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cardinality {
    /// A subject has at most one object; a new edge displaces the old one.
    OneObjectPerSubject,
    /// A subject may have any number of objects.
    ManyObjectsPerSubject,
}

/// Which end of an edge is the child when the relation is shown as a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TreeOrientation {
    /// The subject hangs under the object (e.g. a work under its folder).
    SubjectIsChild,
    /// The object hangs under the subject (e.g. a sub-debate under its debate).
    ObjectIsChild,
}

impl TreeOrientation {
    /// Returns the opposite orientation.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::SubjectIsChild => Self::ObjectIsChild,
            Self::ObjectIsChild => Self::SubjectIsChild,
        }
    }

    /// Maps `(subject, object)` to `(child, parent)`.
    #[must_use]
    pub fn child_parent(self, subject: RecordRef, object: RecordRef) -> (RecordRef, RecordRef) {
        match self {
            Self::SubjectIsChild => (subject, object),
            Self::ObjectIsChild => (object, subject),
        }
    }
}

/// Kind of nested attribute a relation's edges may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeKind {
    /// A pointer to a record of the given type (e.g. a verdict record).
    Record(RecordType),
    /// Free text.
    Text,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(ty) => write!(f, "record of {ty}"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Nested attribute value attached to one edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Attribute {
    /// Pointer to a record.
    Record(RecordRef),
    /// Free text.
    Text(String),
}

impl Attribute {
    /// Returns the referenced record, if this is a record attribute.
    #[must_use]
    pub fn as_record(&self) -> Option<RecordRef> {
        match self {
            Self::Record(record) => Some(*record),
            Self::Text(_) => None,
        }
    }
}
