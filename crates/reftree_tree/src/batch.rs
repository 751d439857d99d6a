//! Scoped batch guard.

use crate::factory::RowFactory;
use crate::projection::TreeProjection;

/// Keeps a batch scope open on a [`TreeProjection`] until dropped.
///
/// Returned by [`TreeProjection::batch`]. While any scope is open, pruning
/// notifications are collected instead of delivered; the outermost scope
/// reports them once when it closes.
#[derive(Debug)]
pub struct Batch<'a, F: RowFactory + 'static> {
    projection: &'a TreeProjection<F>,
}

impl<'a, F: RowFactory + 'static> Batch<'a, F> {
    pub(crate) fn new(projection: &'a TreeProjection<F>) -> Self {
        Self { projection }
    }
}

impl<F: RowFactory + 'static> Drop for Batch<'_, F> {
    fn drop(&mut self) {
        self.projection.end_batch();
    }
}
