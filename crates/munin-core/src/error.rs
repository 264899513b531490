//! Shared error type across munin crates.

use thiserror::Error;

use crate::metrics::MetricKind;

/// Stable error codes (used in logs and asserted by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Graph name outside the protocol identifier grammar.
    InvalidGraphName,
    /// Two data sources of one graph share a field name.
    DuplicateField,
    /// Property applied to a metric of another kind.
    IncompatibleMetricKind,
    /// Metric kind not known to the property catalog.
    UnsupportedMetricKind,
    /// Property identifier not in the catalog.
    UnknownProperty,
    /// Metric name already registered under another kind.
    MetricKindConflict,
    /// Protocol command not understood.
    UnknownCommand,
    /// Invalid input (configuration, arguments).
    BadRequest,
    /// Socket or file I/O failure.
    Io,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidGraphName => "INVALID_GRAPH_NAME",
            ErrorCode::DuplicateField => "DUPLICATE_FIELD",
            ErrorCode::IncompatibleMetricKind => "INCOMPATIBLE_METRIC_KIND",
            ErrorCode::UnsupportedMetricKind => "UNSUPPORTED_METRIC_KIND",
            ErrorCode::UnknownProperty => "UNKNOWN_PROPERTY",
            ErrorCode::MetricKindConflict => "METRIC_KIND_CONFLICT",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Io => "IO",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MuninError>;

/// Unified error type used by core and node.
#[derive(Debug, Error)]
pub enum MuninError {
    #[error("invalid graph name: {0:?}")]
    InvalidGraphName(String),
    #[error("duplicate field {field:?} in graph {graph:?}")]
    DuplicateField { graph: String, field: String },
    #[error("property {property} cannot be read from a {metric}")]
    IncompatibleMetricKind { property: String, metric: MetricKind },
    #[error("unsupported metric kind: {0}")]
    UnsupportedMetricKind(String),
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("metric {name:?} is already registered as a {existing}")]
    MetricKindConflict { name: String, existing: MetricKind },
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl MuninError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MuninError::InvalidGraphName(_) => ErrorCode::InvalidGraphName,
            MuninError::DuplicateField { .. } => ErrorCode::DuplicateField,
            MuninError::IncompatibleMetricKind { .. } => ErrorCode::IncompatibleMetricKind,
            MuninError::UnsupportedMetricKind(_) => ErrorCode::UnsupportedMetricKind,
            MuninError::UnknownProperty(_) => ErrorCode::UnknownProperty,
            MuninError::MetricKindConflict { .. } => ErrorCode::MetricKindConflict,
            MuninError::UnknownCommand(_) => ErrorCode::UnknownCommand,
            MuninError::BadRequest(_) => ErrorCode::BadRequest,
            MuninError::Io(_) => ErrorCode::Io,
            MuninError::Internal(_) => ErrorCode::Internal,
        }
    }
}
