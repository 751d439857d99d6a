//! Reftree - Typed record graph with live tree projections
//!
//! This crate re-exports all layers of the reftree system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: reftree_tree        - Tree projections, row arena, UI seams
//! Layer 1: reftree_storage     - Relation indices, relation sets, record graph
//! Layer 0: reftree_foundation  - Record identifiers, record types, errors
//! ```

pub use reftree_foundation as foundation;
pub use reftree_storage as storage;
pub use reftree_tree as tree;
