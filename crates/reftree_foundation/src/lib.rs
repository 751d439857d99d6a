//! Core types for reftree.
//!
//! This crate provides:
//! - [`RecordRef`] - Opaque record identity (type tag plus id)
//! - [`Interner`] - Record type names interned to [`RecordType`] tags
//! - [`RecordSet`] - Persistent record set with O(1) clone
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod intern;
pub mod record;

pub use collections::RecordSet;
pub use error::{Error, ErrorContext, ErrorKind, Result, Role};
pub use intern::Interner;
pub use record::{RecordId, RecordRef, RecordType};
