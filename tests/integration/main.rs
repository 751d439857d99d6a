//! Cross-layer integration tests for reftree
//!
//! Tests that verify graphs and projections working together on realistic
//! record models.

mod folders;
