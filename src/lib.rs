//! # canonical-gauss
//!
//! Algebra over weighted multivariate Gaussian distributions in
//! *canonical* (information) form: each distribution is a mean vector,
//! a precision matrix (inverse covariance), and a scalar evidence
//! weight.
//!
//! ## Core Concepts
//!
//! - **Canonical form is additive under evidence**: fusing independent
//!   estimates sums their precisions, so combination is arithmetic
//!   rather than integration.
//! - **Fusion** is point-wise density multiplication: the Bayesian
//!   combination of independent evidence about the same quantity.
//! - **Defusion** is the inverse operator: dividing one component's
//!   evidence back out of a combined estimate.
//! - **Weights are bookkeeping**: an unnormalized likelihood multiplier
//!   accumulated across compositions, clamped after every step so that
//!   long chains stay inside `f64` range.
//!
//! ## Weight policy
//!
//! Fused weights are clamped into
//! [`FUSED_WEIGHT_MIN`]..=[`FUSED_WEIGHT_MAX`]. Defused weights map
//! infinities to fixed sentinels and are floored at [`DENSITY_FLOOR`].
//! Evaluated densities are floored at [`DENSITY_FLOOR`] as well. This
//! clamping is a precision-loss policy, not a correctness guarantee;
//! see the individual operations for details.
//!
//! ## Example
//!
//! ```rust
//! use canonical_gauss::{CanonicalGaussian, Matrix};
//!
//! // Two independent unit-precision estimates of a 2-D quantity.
//! let a = CanonicalGaussian::with_unit_weight(vec![0.0, 0.0], Matrix::identity(2)).unwrap();
//! let b = CanonicalGaussian::with_unit_weight(vec![2.0, 0.0], Matrix::identity(2)).unwrap();
//!
//! // Fusion lands halfway, with doubled precision.
//! let fused = a.fuse(&b).unwrap();
//! assert!((fused.mean()[0] - 1.0).abs() < 1e-9);
//! assert!((fused.precision().get(0, 0) - 2.0).abs() < 1e-9);
//!
//! // Defusion removes b's contribution again.
//! let recovered = fused.defuse(&b).unwrap();
//! assert!((recovered.mean()[0] - a.mean()[0]).abs() < 1e-9);
//!
//! // Weighted density at the fused mean.
//! let density = fused.pdf(&[1.0, 0.0]).unwrap();
//! assert!(density > 0.0);
//! ```

mod canonical;
mod error;
mod matrix;

pub use canonical::CanonicalGaussian;
pub use error::GaussError;
pub use matrix::{Cholesky, Matrix};

/// Lower clamp bound for fused weights.
pub const FUSED_WEIGHT_MIN: f64 = 1e-300;

/// Upper clamp bound for fused weights.
pub const FUSED_WEIGHT_MAX: f64 = 1e300;

/// Floor for evaluated densities and defused weights, and the sentinel
/// that negative-infinite defused weights collapse to.
pub const DENSITY_FLOOR: f64 = 1e-200;

/// Sentinel magnitude that positive-infinite defused weights collapse
/// to.
pub const OVERFLOW_SENTINEL: f64 = 1e200;
