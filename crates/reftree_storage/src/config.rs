//! Configuration for the record graph.

/// Configuration for a [`RecordGraph`](crate::RecordGraph).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphConfig {
    /// Validate endpoint record types on every edge insertion.
    ///
    /// Turning this off is only sensible for trusted bulk loads.
    pub check_record_types: bool,

    /// Emit a `trace` event for every dispatched edge change.
    pub trace_events: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            check_record_types: true,
            trace_events: false,
        }
    }
}

impl GraphConfig {
    /// Configuration for debugging: every dispatched change is traced.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            trace_events: true,
            ..Self::default()
        }
    }

    /// Configuration for bulk loading trusted data.
    #[must_use]
    pub fn bulk_load() -> Self {
        Self {
            check_record_types: false,
            trace_events: false,
        }
    }

    /// Builder method to enable/disable record type checks.
    #[must_use]
    pub fn with_record_type_checks(mut self, check: bool) -> Self {
        self.check_record_types = check;
        self
    }

    /// Builder method to enable/disable event tracing.
    #[must_use]
    pub fn with_trace_events(mut self, trace: bool) -> Self {
        self.trace_events = trace;
        self
    }
}
