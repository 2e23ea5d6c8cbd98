//! Error types for canonical-form Gaussian arithmetic.
//!
//! Fusion and defusion are only defined when the operand shapes agree
//! and every precision matrix involved stays symmetric positive-definite
//! through the required inversions. Violations are typed domain errors;
//! they never propagate as NaN or infinite entries in a result.

use thiserror::Error;

/// Errors produced by canonical-form Gaussian operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GaussError {
    /// Operand shapes disagree with each other or with the dimension d.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A required factorization hit a matrix that is singular or not
    /// positive-definite, so the operation is mathematically ill-posed.
    #[error("Matrix is singular or not positive-definite: {context}")]
    SingularMatrix { context: String },

    /// The operation is not defined in this algebra.
    #[error("Unsupported operation: {reason}")]
    UnsupportedOperation { reason: String },

    /// A constructor argument is outside its valid range.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}
