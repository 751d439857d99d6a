//! Relation storage and change dispatch for reftree.
//!
//! This crate provides:
//! - [`RelationIndex`] - Bidirectional parent/child index
//! - [`RelationSchema`] - Relation type declarations
//! - [`RelationSet`] - Typed, validated edges of one relation
//! - [`RecordGraph`] - All relations plus listener dispatch

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod event;
pub mod graph;
pub mod index;
pub mod relation;
pub mod schema;

pub use config::GraphConfig;
pub use event::{EdgeChange, EdgeChangeKind, EdgeEvent, ListenerControl, ListenerId};
pub use graph::{GraphSnapshot, RecordGraph};
pub use index::RelationIndex;
pub use relation::RelationSet;
pub use schema::{
    Attribute, AttributeKind, Cardinality, RelationId, RelationSchema, TreeOrientation,
};
