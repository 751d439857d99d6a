//! Configuration for tree projections.

/// Configuration for a [`TreeProjection`](crate::TreeProjection).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Name used in log output.
    pub label: String,

    /// Expand the root row whenever a new root is set.
    pub expand_root: bool,

    /// Skip a child under a row whose path to the root already shows the
    /// child's record. Needed whenever a subscribed relation allows cycles or
    /// several relations together can form one.
    pub guard_ancestors: bool,

    /// Emit a `trace` event for every row created or torn down.
    pub trace_rows: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            label: "tree".to_string(),
            expand_root: true,
            guard_ancestors: true,
            trace_rows: false,
        }
    }
}

impl ProjectionConfig {
    /// Default configuration under a given label.
    #[must_use]
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Configuration for debugging: every row change is traced.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            trace_rows: true,
            ..Self::default()
        }
    }

    /// Builder method to set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder method to enable/disable expanding the root.
    #[must_use]
    pub fn with_expand_root(mut self, expand: bool) -> Self {
        self.expand_root = expand;
        self
    }

    /// Builder method to enable/disable the ancestor guard.
    #[must_use]
    pub fn with_guard_ancestors(mut self, guard: bool) -> Self {
        self.guard_ancestors = guard;
        self
    }

    /// Builder method to enable/disable row tracing.
    #[must_use]
    pub fn with_trace_rows(mut self, trace: bool) -> Self {
        self.trace_rows = trace;
        self
    }
}
