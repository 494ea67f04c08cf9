//! Error types for the analysis pipeline.

use thiserror::Error;

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during a forensic analysis.
///
/// Per-row anomalies (bad amounts, unparseable timestamps) are repaired by
/// the normalizer and never surface here; these variants cover whole-input
/// and pipeline-level failures only.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required input column is absent from the record stream.
    #[error("required column missing from input: {column}")]
    SchemaMissing {
        /// Name of the missing column.
        column: String,
    },

    /// No usable records remained after normalization.
    #[error("input contains no usable records")]
    EmptyInput,

    /// A detector violated one of its documented invariants.
    #[error("detector '{detector}' failed: {detail}")]
    DetectorInternal {
        /// Identifier of the failing detector.
        detector: String,
        /// Failure detail.
        detail: String,
    },

    /// The analysis was cancelled between phases.
    #[error("analysis cancelled")]
    Cancelled,

    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Create a schema-missing error.
    #[must_use]
    pub fn schema_missing(column: impl Into<String>) -> Self {
        EngineError::SchemaMissing {
            column: column.into(),
        }
    }

    /// Create a detector-internal error.
    #[must_use]
    pub fn detector(detector: impl Into<String>, detail: impl Into<String>) -> Self {
        EngineError::DetectorInternal {
            detector: detector.into(),
            detail: detail.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig(msg.into())
    }

    /// Returns true if the analysis can proceed in degraded mode after this
    /// error (only detector-internal faults qualify; everything else aborts
    /// the whole invocation).
    #[must_use]
    pub fn is_detector_fault(&self) -> bool {
        matches!(self, EngineError::DetectorInternal { .. })
    }
}
