//! Record type interning.
//!
//! Record type names are interned once at startup so that type checks on
//! every edge insertion are integer comparisons.

// Record type counts stay far below u32::MAX
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::record::RecordType;

/// Interner mapping record type names to [`RecordType`] tags and back.
///
/// Not thread-safe; the core runs on a single logical thread.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interner {
    names: Vec<Arc<str>>,
    by_name: HashMap<Arc<str>, RecordType>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a record type name, returning its tag.
    ///
    /// Interning the same name twice returns the same tag.
    pub fn intern(&mut self, name: &str) -> RecordType {
        if let Some(&ty) = self.by_name.get(name) {
            return ty;
        }

        let ty = RecordType(self.names.len() as u32);
        let arc: Arc<str> = name.into();
        self.names.push(arc.clone());
        self.by_name.insert(arc, ty);
        ty
    }

    /// Looks up a previously interned name without interning it.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<RecordType> {
        self.by_name.get(name).copied()
    }

    /// Gets the name for a record type.
    #[must_use]
    pub fn name(&self, ty: RecordType) -> Option<&str> {
        self.names.get(ty.0 as usize).map(AsRef::as_ref)
    }

    /// Returns the number of interned record types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
