//! Record identity.
//!
//! The core never owns records. It refers to them by a [`RecordRef`], the
//! pair of an interned [`RecordType`] tag and an opaque [`RecordId`] handed
//! out by the external record store.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque record identifier assigned by the record store.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordId(pub u64);

impl RecordId {
    /// Creates a record ID.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interned record type tag (e.g. `work`, `argument`, `position`).
///
/// Produced by [`Interner::intern`](crate::Interner::intern); the name can
/// be recovered through the same interner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordType(pub(crate) u32);

impl RecordType {
    /// Returns the raw index of this record type.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordType({})", self.0)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Reference to a record: its type tag and identifier.
///
/// Two references are equal only if both the type and the id match, so
/// stores that number each record type independently are supported.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordRef {
    /// The record's type tag.
    pub ty: RecordType,
    /// The record's identifier within the store.
    pub id: RecordId,
}

impl RecordRef {
    /// Creates a record reference.
    #[must_use]
    pub const fn new(ty: RecordType, id: u64) -> Self {
        Self {
            ty,
            id: RecordId(id),
        }
    }

    /// Returns true if this record has the given type.
    #[must_use]
    pub fn is_a(self, ty: RecordType) -> bool {
        self.ty == ty
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({}:{})", self.ty.0, self.id.0)
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ty, self.id)
    }
}
