//! Error types for support queries and the approximation engine.

use thiserror::Error;

/// Errors raised by set queries and polygonal approximation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetError {
    /// The support function is `+∞` in the queried direction.
    #[error("set is unbounded in direction {direction:?}")]
    UnboundedDirection {
        /// Queried direction (lossy `f64` copy).
        direction: Vec<f64>,
    },

    /// A local approximation whose points collapsed was asked to refine.
    #[error("degenerate local approximation cannot be refined")]
    DegenerateApproximation,

    /// The iteration or depth guard fired before the tolerance was met.
    #[error("precision not achieved after {iterations} refinements (error bound {achieved})")]
    PrecisionNotAchieved {
        /// Best certified error bound reached.
        achieved: f64,
        /// Number of refinements performed.
        iterations: usize,
    },

    /// Direction length and set dimension disagree.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension of the set.
        expected: usize,
        /// Length of the offending vector or operand.
        found: usize,
    },

    /// No closed-form rule exists for this combination of operands.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The queried set has no elements.
    #[error("set is empty")]
    EmptySet,

    /// Approximation tolerance must be strictly positive.
    #[error("tolerance must be strictly positive")]
    InvalidTolerance,
}

/// Result alias used across the crate.
pub type SetResult<T> = Result<T, SetError>;

/// Fail with `DimensionMismatch` unless `found == expected`.
#[inline]
pub fn check_dim(expected: usize, found: usize) -> SetResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SetError::DimensionMismatch { expected, found })
    }
}
