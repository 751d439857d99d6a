//! Live tree projections for reftree.
//!
//! This crate provides:
//! - [`TreeProjection`] - A rooted tree kept in step with graph relations
//! - [`RowFactory`] / [`TreeObserver`] - Seams to the UI layer
//! - [`Batch`] - Scoped deferral of pruning notifications
//! - [`ProjectionConfig`] - Projection settings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod arena;
pub mod batch;
pub mod config;
pub mod factory;
pub mod projection;
mod rows;

pub use arena::RowId;
pub use batch::Batch;
pub use config::ProjectionConfig;
pub use factory::{NoObserver, RowFactory, TreeId, TreeObserver};
pub use projection::{Direction, ProjectionState, TreeProjection, TreeRow};
