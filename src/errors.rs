//! Error types shared across the crate

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TpmsError>;

/// Everything that can stop a lattice run.
///
/// A mesh that is still leaking after the last refinement pass is *not* an
/// error; see [`crate::refine::MeshStatus::BestEffort`].
#[derive(Debug, Error)]
pub enum TpmsError {
    /// A design parameter violates its documented range.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameters {
        /// Name of the offending parameter
        field: &'static str,
        /// Human readable reason
        reason: String,
    },

    /// A design name that matches none of the known variants.
    #[error("unknown TPMS design variant `{0}`")]
    UnknownDesignVariant(String),

    /// The boolean kernel rejected or could not process its input.
    #[error("boolean kernel failed during {operation}: {reason}")]
    BooleanKernelFailure {
        /// `intersection`, `difference` or `fill_holes`
        operation: &'static str,
        /// What went wrong
        reason: String,
    },

    /// The run's cancellation token was set before a pass started.
    #[error("refinement cancelled after {passes_completed} pass(es)")]
    Cancelled {
        /// Number of passes that finished before cancellation was observed
        passes_completed: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("design file could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TpmsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TpmsError::InvalidParameters {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn kernel(operation: &'static str, reason: impl Into<String>) -> Self {
        TpmsError::BooleanKernelFailure {
            operation,
            reason: reason.into(),
        }
    }
}
