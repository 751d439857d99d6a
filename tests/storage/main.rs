//! Integration tests for Layer 1: Storage
//!
//! Tests for relation sets, the record graph, and change dispatch.

mod graph;
