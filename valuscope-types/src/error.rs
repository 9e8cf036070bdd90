use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the valuscope workspace.
///
/// Structural failures (missing columns, unknown operators, malformed filter
/// payloads) abort the whole operation. Numeric shortfalls such as a rolling
/// window with too few observations are not errors: they surface as missing
/// values in the output column.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValuscopeError {
    /// An external series source returned an error.
    #[error("{source_name} failed: {msg}")]
    Retrieval {
        /// Name of the source that failed.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A single source call exceeded the configured timeout.
    #[error("source timed out: {capability} via {source_name}")]
    SourceTimeout {
        /// Name of the source that timed out.
        source_name: String,
        /// Capability label (e.g. "valuation", "price_history").
        capability: String,
    },

    /// Every retry attempt for a capability failed; carries the last failure.
    #[error("{capability} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Capability label that was retried.
        capability: String,
        /// Number of attempts made.
        attempts: u32,
        /// The error returned by the final attempt.
        last: Box<ValuscopeError>,
    },

    /// A required column is absent from the input table.
    #[error("missing column: {column}")]
    Schema {
        /// Name of the missing column.
        column: String,
    },

    /// A filter condition named an operator outside the recognised set.
    #[error("unsupported operator: {operator}")]
    UnsupportedOperator {
        /// The operator tag as received.
        operator: String,
    },

    /// Invalid input argument (malformed filter specification, bad configuration).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with the data itself (uncoercible cells, ragged tables).
    #[error("data issue: {0}")]
    Data(String),
}

impl ValuscopeError {
    /// Helper: build a `Retrieval` error with the source name and message.
    pub fn retrieval(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Retrieval {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `SourceTimeout` error.
    pub fn source_timeout(source_name: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::SourceTimeout {
            source_name: source_name.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `Schema` error for a missing column.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }

    /// Helper: build an `UnsupportedOperator` error.
    pub fn unsupported_operator(operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            operator: operator.into(),
        }
    }

    /// Returns true for failures that originate outside the engine and may
    /// succeed when the call is repeated.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Retrieval { .. } | Self::SourceTimeout { .. })
    }
}
