//! Record -> rows index.
//!
//! Every row a projection creates is registered here under its record, and
//! unregistered when it is torn down, so "find every place this record is
//! shown" is a single lookup.

use std::collections::HashMap;

use reftree_foundation::{RecordRef, RecordSet};

use crate::arena::RowId;

/// Multi-map from a record to the rows currently representing it.
///
/// Rows of one record are kept in creation order.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordRows {
    rows: HashMap<RecordRef, Vec<RowId>>,
}

impl RecordRows {
    /// Registers a row. Returns true if it is the record's first row.
    pub(crate) fn insert(&mut self, record: RecordRef, row: RowId) -> bool {
        let rows = self.rows.entry(record).or_default();
        let first = rows.is_empty();
        if !rows.contains(&row) {
            rows.push(row);
        }
        first
    }

    /// Unregisters a row. Returns true if the record has no rows left.
    pub(crate) fn remove(&mut self, record: RecordRef, row: RowId) -> bool {
        let Some(rows) = self.rows.get_mut(&record) else {
            return false;
        };
        let before = rows.len();
        rows.retain(|r| *r != row);
        if rows.len() == before {
            return false;
        }
        if rows.is_empty() {
            self.rows.remove(&record);
            return true;
        }
        false
    }

    pub(crate) fn rows_for(&self, record: RecordRef) -> &[RowId] {
        self.rows.get(&record).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn contains(&self, record: RecordRef) -> bool {
        self.rows.contains_key(&record)
    }

    pub(crate) fn records(&self) -> RecordSet {
        self.rows.keys().copied().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }
}
