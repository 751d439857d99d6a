//! Error types for reftree.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. Every
//! error is local to the call that produced it and leaves the graph and its
//! projections unchanged unless the operation documents otherwise.

use std::fmt;

use thiserror::Error;

use crate::record::{RecordRef, RecordType};

/// Result alias used throughout reftree.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for reftree operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a cycle error for a rejected edge.
    #[must_use]
    pub fn cycle(relation: impl Into<String>, subject: RecordRef, object: RecordRef) -> Self {
        let relation = relation.into();
        let description = if subject == object {
            format!("{subject} cannot be related to itself through {relation}")
        } else {
            format!(
                "{object} already leads back to {subject} through {relation}; \
                 linking {subject} to it would create a cycle"
            )
        };
        Self::new(ErrorKind::Cycle {
            relation,
            subject,
            object,
            description,
        })
    }

    /// Creates an error for an attribute write on an edge that does not exist.
    #[must_use]
    pub fn missing_attribute_target(
        relation: impl Into<String>,
        subject: RecordRef,
        object: RecordRef,
    ) -> Self {
        Self::new(ErrorKind::MissingAttributeTarget {
            relation: relation.into(),
            subject,
            object,
        })
    }

    /// Creates an unknown relation error.
    #[must_use]
    pub fn unknown_relation(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownRelation(name.into()))
    }

    /// Creates a record type mismatch error.
    #[must_use]
    pub fn record_type_mismatch(
        relation: impl Into<String>,
        role: Role,
        expected: RecordType,
        actual: RecordType,
    ) -> Self {
        Self::new(ErrorKind::RecordTypeMismatch {
            relation: relation.into(),
            role,
            expected,
            actual,
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this is a rejected-cycle error.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self.kind, ErrorKind::Cycle { .. })
    }
}

/// Which end of an edge a record occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The subject (source) of the edge.
    Subject,
    /// The object (target) of the edge.
    Object,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject => write!(f, "subject"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Adding the edge would close a cycle in an acyclic relation.
    #[error("cycle rejected in {relation}: {description}")]
    Cycle {
        /// Name of the relation.
        relation: String,
        /// Subject of the rejected edge.
        subject: RecordRef,
        /// Object of the rejected edge.
        object: RecordRef,
        /// Human-readable explanation, suitable for a message dialog.
        description: String,
    },

    /// A nested attribute was written to an edge that does not exist.
    #[error("no {relation} edge from {subject} to {object} to attach an attribute to")]
    MissingAttributeTarget {
        /// Name of the relation.
        relation: String,
        /// Subject of the missing edge.
        subject: RecordRef,
        /// Object of the missing edge.
        object: RecordRef,
    },

    /// The relation is not registered with the graph.
    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    /// A relation with the same name is already registered.
    #[error("relation already registered: {0}")]
    DuplicateRelation(String),

    /// An endpoint's record type does not match the relation's declaration.
    #[error("{relation} expects a {role} of {expected}, got {actual}")]
    RecordTypeMismatch {
        /// Name of the relation.
        relation: String,
        /// Which endpoint was wrong.
        role: Role,
        /// Declared record type.
        expected: RecordType,
        /// Record type that was supplied.
        actual: RecordType,
    },

    /// The attribute value does not match the relation's attribute kind.
    #[error("{relation} does not accept this attribute (expected {expected})")]
    AttributeKindMismatch {
        /// Name of the relation.
        relation: String,
        /// Description of the declared attribute kind.
        expected: String,
    },

    /// A projection already listens to this relation in this direction.
    #[error("projection already subscribed to {relation}")]
    DuplicateSubscription {
        /// Name of the relation.
        relation: String,
    },

    /// A projection was rooted before subscribing to any relation.
    #[error("projection has no subscribed relations")]
    NotSubscribed,

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that failed (e.g. `add_edge`).
    pub operation: Option<String>,
    /// Stack of enclosing operations, innermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
