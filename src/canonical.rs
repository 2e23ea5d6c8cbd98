//! Weighted multivariate Gaussians in canonical (information) form.
//!
//! A [`CanonicalGaussian`] carries a mean vector, a precision matrix
//! (the inverse covariance), and a scalar evidence weight. In this
//! parameterization, combining independent evidence is additive:
//!
//! - **Fusion** ([`CanonicalGaussian::fuse`]) multiplies two densities
//!   point-wise. Precisions add, means combine precision-weighted, and
//!   the weight picks up the Gaussian-product normalizing constant:
//!   the likelihood that the two component means describe the same
//!   quantity, given their summed uncertainty.
//! - **Defusion** ([`CanonicalGaussian::defuse`]) is the inverse
//!   operator: it divides one density's evidence out of another,
//!   recovering what remains once a component is removed.
//!
//! This is the arithmetic of information-filter style Bayesian fusion,
//! e.g. merging independent noisy estimates of the same quantity.
//!
//! # Example
//!
//! ```rust
//! use canonical_gauss::{CanonicalGaussian, Matrix};
//!
//! // Two unit-precision estimates of a 2-D position.
//! let a = CanonicalGaussian::with_unit_weight(vec![0.0, 0.0], Matrix::identity(2)).unwrap();
//! let b = CanonicalGaussian::with_unit_weight(vec![2.0, 0.0], Matrix::identity(2)).unwrap();
//!
//! // Fusing lands halfway between them, with doubled precision.
//! let fused = a.fuse(&b).unwrap();
//! assert!((fused.mean()[0] - 1.0).abs() < 1e-9);
//! assert!((fused.precision().get(0, 0) - 2.0).abs() < 1e-9);
//!
//! // Removing b's evidence recovers a's parameters.
//! let recovered = fused.defuse(&b).unwrap();
//! assert!((recovered.mean()[0] - 0.0).abs() < 1e-9);
//! assert!((recovered.precision().get(0, 0) - 1.0).abs() < 1e-9);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::GaussError;
use crate::matrix::Matrix;
use crate::{DENSITY_FLOOR, FUSED_WEIGHT_MAX, FUSED_WEIGHT_MIN, OVERFLOW_SENTINEL};

/// A weighted multivariate Gaussian over ℝᵈ in canonical form.
///
/// The weight is an unnormalized evidence multiplier accumulated across
/// compositions: bookkeeping for relative likelihood, not a
/// probability mass. Instances are immutable value objects; every
/// operator returns a fresh instance.
///
/// Construction checks only that the mean length matches the precision
/// dimension. Symmetry and positive-definiteness of the precision are
/// the caller's responsibility and are enforced lazily, by the
/// factorizations inside [`fuse`](Self::fuse), [`defuse`](Self::defuse),
/// [`pdf`](Self::pdf), and [`log_pdf`](Self::log_pdf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalGaussian {
    mean: Vec<f64>,
    precision: Matrix,
    weight: f64,
}

impl CanonicalGaussian {
    /// Create a Gaussian from its mean, precision matrix, and weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the mean length does not match the precision
    /// dimension.
    pub fn new(mean: Vec<f64>, precision: Matrix, weight: f64) -> Result<Self, GaussError> {
        if mean.len() != precision.dim() {
            return Err(GaussError::DimensionMismatch {
                expected: precision.dim(),
                got: mean.len(),
            });
        }
        Ok(Self {
            mean,
            precision,
            weight,
        })
    }

    /// [`new`](Self::new) with the default weight of 1 (an unweighted
    /// component).
    pub fn with_unit_weight(mean: Vec<f64>, precision: Matrix) -> Result<Self, GaussError> {
        Self::new(mean, precision, 1.0)
    }

    /// The standard Gaussian over ℝᵈ: zero mean, identity precision,
    /// weight 1.
    pub fn standard(dim: usize) -> Self {
        assert!(dim > 0, "Cannot create a zero-dimensional Gaussian");
        Self {
            mean: vec![0.0; dim],
            precision: Matrix::identity(dim),
            weight: 1.0,
        }
    }

    /// An isotropic Gaussian: the same precision along every axis.
    ///
    /// # Errors
    ///
    /// Returns an error if `precision_scale` is not positive.
    pub fn spherical(mean: Vec<f64>, precision_scale: f64) -> Result<Self, GaussError> {
        if precision_scale <= 0.0 {
            return Err(GaussError::InvalidParameter {
                name: "precision_scale".to_string(),
                reason: "precision must be positive".to_string(),
            });
        }
        let precision = Matrix::identity(mean.len()).scale(precision_scale);
        Self::new(mean, precision, 1.0)
    }

    /// A Gaussian with independent axes and per-axis precisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ or any precision is not
    /// positive.
    pub fn diagonal(mean: Vec<f64>, precisions: Vec<f64>) -> Result<Self, GaussError> {
        if precisions.len() != mean.len() {
            return Err(GaussError::DimensionMismatch {
                expected: mean.len(),
                got: precisions.len(),
            });
        }
        for (i, &p) in precisions.iter().enumerate() {
            if p <= 0.0 {
                return Err(GaussError::InvalidParameter {
                    name: format!("precisions[{}]", i),
                    reason: "precision must be positive".to_string(),
                });
            }
        }
        let precision = Matrix::diagonal(&precisions);
        Self::new(mean, precision, 1.0)
    }

    /// Convert from moment form N(mean, covariance) to canonical form.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes disagree or the covariance is
    /// singular or not positive-definite.
    pub fn from_moments(
        mean: Vec<f64>,
        covariance: Matrix,
        weight: f64,
    ) -> Result<Self, GaussError> {
        if mean.len() != covariance.dim() {
            return Err(GaussError::DimensionMismatch {
                expected: covariance.dim(),
                got: mean.len(),
            });
        }
        let precision = covariance.cholesky()?.inverse();
        Self::new(mean, precision, weight)
    }

    /// The mean vector.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// The precision matrix (inverse covariance).
    pub fn precision(&self) -> &Matrix {
        &self.precision
    }

    /// The evidence weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The dimension d.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// The covariance matrix: the inverse of the precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the precision is singular or not
    /// positive-definite.
    pub fn covariance(&self) -> Result<Matrix, GaussError> {
        Ok(self.precision.cholesky()?.inverse())
    }

    /// Fuse two Gaussians: point-wise multiplication of their densities.
    ///
    /// The fused precision is the sum of the component precisions, the
    /// fused mean is the precision-weighted combination of the component
    /// means, and the fused weight is the product of the component
    /// weights times the Gaussian-product normalizing constant: the
    /// density of `self`'s mean under a Gaussian centered at `other`'s
    /// mean with the summed covariance. The weight is clamped into
    /// [`FUSED_WEIGHT_MIN`]..=[`FUSED_WEIGHT_MAX`].
    ///
    /// Fusion is commutative: `a.fuse(&b)` and `b.fuse(&a)` run the same
    /// kernel and agree up to floating-point rounding.
    ///
    /// # Errors
    ///
    /// Returns [`GaussError::DimensionMismatch`] if the operand
    /// dimensions differ, and [`GaussError::SingularMatrix`] if the
    /// summed precision, either component precision, or the summed
    /// covariance is singular or not positive-definite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use canonical_gauss::{CanonicalGaussian, Matrix};
    ///
    /// let a = CanonicalGaussian::standard(2);
    /// let b = CanonicalGaussian::with_unit_weight(vec![2.0, 0.0], Matrix::identity(2)).unwrap();
    ///
    /// let fused = a.fuse(&b).unwrap();
    /// // Precisions add.
    /// assert!((fused.precision().get(0, 0) - 2.0).abs() < 1e-12);
    /// ```
    pub fn fuse(&self, other: &Self) -> Result<Self, GaussError> {
        self.check_same_dim(other)?;

        let precision = self.precision.add(&other.precision)?;
        let fused_chol = precision.cholesky()?;

        let info_a = self.precision.matvec(&self.mean)?;
        let info_b = other.precision.matvec(&other.mean)?;
        let info: Vec<f64> = info_a.iter().zip(&info_b).map(|(a, b)| a + b).collect();
        let mean = fused_chol.solve(&info)?;

        // Normalizing constant: the density of the mean difference
        // under the summed covariance.
        let cov_a = self.precision.cholesky()?.inverse();
        let cov_b = other.precision.cholesky()?.inverse();
        let spread = cov_a.add(&cov_b)?;
        let agreement =
            Self::with_unit_weight(other.mean.clone(), spread.cholesky()?.inverse())?;
        let raw = agreement.pdf(&self.mean)? * self.weight * other.weight;

        Ok(Self {
            mean,
            precision,
            weight: raw.clamp(FUSED_WEIGHT_MIN, FUSED_WEIGHT_MAX),
        })
    }

    /// Defuse: divide `other`'s density out of `self`, the inverse of
    /// [`fuse`](Self::fuse).
    ///
    /// The residual precision is the difference of the precisions and
    /// the residual mean the precision-weighted difference of the means.
    /// The weight applies a ratio-of-determinants correction divided by
    /// the density of `self`'s mean under a Gaussian centered at
    /// `other`'s mean with the differenced covariance, scaled by the
    /// weight ratio. Infinite intermediate weights collapse to fixed
    /// sentinels ([`DENSITY_FLOOR`], [`OVERFLOW_SENTINEL`]) and the
    /// result never drops below [`DENSITY_FLOOR`]; there is no upper
    /// clamp in this family.
    ///
    /// # Errors
    ///
    /// Returns [`GaussError::DimensionMismatch`] if the operand
    /// dimensions differ, and [`GaussError::SingularMatrix`] if the
    /// differenced precision or differenced covariance is singular or
    /// not positive-definite, i.e. `other` is not strictly contained
    /// in `self`'s evidence and the division is ill-posed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use canonical_gauss::{CanonicalGaussian, Matrix};
    ///
    /// let a = CanonicalGaussian::standard(2);
    /// let b = CanonicalGaussian::with_unit_weight(vec![2.0, 0.0], Matrix::identity(2)).unwrap();
    ///
    /// let fused = a.fuse(&b).unwrap();
    /// let recovered = fused.defuse(&b).unwrap();
    /// assert!((recovered.mean()[0] - a.mean()[0]).abs() < 1e-9);
    /// ```
    pub fn defuse(&self, other: &Self) -> Result<Self, GaussError> {
        self.check_same_dim(other)?;

        let precision = self.precision.sub(&other.precision)?;
        let residual_chol = precision.cholesky()?;

        let info_a = self.precision.matvec(&self.mean)?;
        let info_b = other.precision.matvec(&other.mean)?;
        let info: Vec<f64> = info_a.iter().zip(&info_b).map(|(a, b)| a - b).collect();
        let mean = residual_chol.solve(&info)?;

        let cov_a = self.precision.cholesky()?.inverse();
        let chol_b = other.precision.cholesky()?;
        let spread = chol_b.inverse().sub(&cov_a)?;
        let spread_chol = spread.cholesky()?;
        let correction = chol_b.determinant() / spread_chol.determinant();
        let agreement = Self::with_unit_weight(other.mean.clone(), spread_chol.inverse())?;
        let raw = correction / agreement.pdf(&self.mean)? * self.weight / other.weight;

        Ok(Self {
            mean,
            precision,
            weight: clamp_defused_weight(raw),
        })
    }

    /// Reverse defusion (dividing `self`'s evidence out of `other`)
    /// is not defined in this algebra.
    ///
    /// # Errors
    ///
    /// Always returns [`GaussError::UnsupportedOperation`]. Use
    /// `other.defuse(self)` when forward division is what is meant.
    pub fn defuse_from(&self, _other: &Self) -> Result<Self, GaussError> {
        Err(GaussError::UnsupportedOperation {
            reason: "reverse defusion is not defined; defuse the operands in forward order"
                .to_string(),
        })
    }

    /// The weighted density at a point, evaluated directly from the
    /// precision form:
    ///
    /// `weight · sqrt(det P / (2π)ᵈ) · exp(−½ (x−μ)ᵀ P (x−μ))`
    ///
    /// Results below [`DENSITY_FLOOR`] return exactly the floor: a
    /// guard against divide-by-zero in callers chaining many fusions,
    /// not a real probability.
    ///
    /// # Errors
    ///
    /// Returns an error if the point length does not match the
    /// dimension, or the precision is singular or not
    /// positive-definite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use canonical_gauss::CanonicalGaussian;
    ///
    /// let g = CanonicalGaussian::standard(1);
    /// // 1/√(2π) ≈ 0.3989
    /// assert!((g.pdf(&[0.0]).unwrap() - 0.3989422804).abs() < 1e-9);
    /// ```
    pub fn pdf(&self, x: &[f64]) -> Result<f64, GaussError> {
        self.check_point_dim(x)?;
        let chol = self.precision.cholesky()?;
        let quad = self.quadratic_form(x)?;
        let norm = (chol.determinant() / (2.0 * PI).powi(self.dim() as i32)).sqrt();
        let density = norm * (-0.5 * quad).exp() * self.weight;
        if density < DENSITY_FLOOR {
            Ok(DENSITY_FLOOR)
        } else {
            Ok(density)
        }
    }

    /// The natural-log density at a point.
    ///
    /// Unlike [`pdf`](Self::pdf), this is the log of the *normalized*
    /// density: the weight is not included and no floor is applied.
    /// Callers that need the weighted form add `weight().ln()`
    /// themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the point length does not match the
    /// dimension, or the precision is singular or not
    /// positive-definite.
    pub fn log_pdf(&self, x: &[f64]) -> Result<f64, GaussError> {
        self.check_point_dim(x)?;
        let chol = self.precision.cholesky()?;
        let quad = self.quadratic_form(x)?;
        let d = self.dim() as f64;
        Ok(-0.5 * (d * (2.0 * PI).ln() - chol.log_determinant() + quad))
    }

    // (x−μ)ᵀ · P · (x−μ)
    fn quadratic_form(&self, x: &[f64]) -> Result<f64, GaussError> {
        let diff: Vec<f64> = x.iter().zip(&self.mean).map(|(xi, mi)| xi - mi).collect();
        let scaled = self.precision.matvec(&diff)?;
        Ok(diff.iter().zip(&scaled).map(|(a, b)| a * b).sum())
    }

    fn check_same_dim(&self, other: &Self) -> Result<(), GaussError> {
        if self.dim() != other.dim() {
            return Err(GaussError::DimensionMismatch {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        Ok(())
    }

    fn check_point_dim(&self, x: &[f64]) -> Result<(), GaussError> {
        if x.len() != self.dim() {
            return Err(GaussError::DimensionMismatch {
                expected: self.dim(),
                got: x.len(),
            });
        }
        Ok(())
    }
}

/// Overflow policy for defused weights: infinities collapse to fixed
/// sentinel magnitudes, then the result is floored. Absolute weight
/// accuracy is not preserved.
fn clamp_defused_weight(raw: f64) -> f64 {
    let sentinel = if raw == f64::NEG_INFINITY {
        DENSITY_FLOOR
    } else if raw == f64::INFINITY {
        OVERFLOW_SENTINEL
    } else {
        raw
    };
    sentinel.max(DENSITY_FLOOR)
}
