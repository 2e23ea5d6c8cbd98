//! Dense square matrices and Cholesky factorization.
//!
//! Canonical-form arithmetic works entirely on symmetric
//! positive-definite precision matrices: every inverse and determinant
//! taken during fusion, defusion, and density evaluation is taken on a
//! matrix that is SPD whenever the operation is well-posed. The
//! Cholesky factorization is therefore both the solver and the domain
//! check: a non-positive pivot means the matrix is singular or not
//! positive-definite, and surfaces as [`GaussError::SingularMatrix`].

use serde::{Deserialize, Serialize};

use crate::error::GaussError;

/// A dense square matrix of `f64` values, stored row-major.
///
/// # Example
///
/// ```rust
/// use canonical_gauss::Matrix;
///
/// let m = Matrix::from_rows(vec![
///     vec![4.0, 2.0],
///     vec![2.0, 3.0],
/// ]).unwrap();
///
/// assert_eq!(m.dim(), 2);
/// assert_eq!(m.get(0, 1), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Row-major entries: `data[i * dim + j]` is row i, column j.
    data: Vec<f64>,
    /// Number of rows (= number of columns).
    dim: usize,
}

impl Matrix {
    /// Create a matrix from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are empty or any row's length does
    /// not match the number of rows (the matrix must be square).
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GaussError> {
        let dim = rows.len();
        if dim == 0 {
            return Err(GaussError::InvalidParameter {
                name: "rows".to_string(),
                reason: "matrix cannot be empty".to_string(),
            });
        }
        let mut data = Vec::with_capacity(dim * dim);
        for row in &rows {
            if row.len() != dim {
                return Err(GaussError::DimensionMismatch {
                    expected: dim,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, dim })
    }

    /// The d×d identity matrix.
    pub fn identity(dim: usize) -> Self {
        Self::diagonal(&vec![1.0; dim])
    }

    /// A matrix with the given entries on the diagonal and zeros elsewhere.
    pub fn diagonal(entries: &[f64]) -> Self {
        let dim = entries.len();
        let mut data = vec![0.0; dim * dim];
        for (i, &e) in entries.iter().enumerate() {
            data[i * dim + i] = e;
        }
        Self { data, dim }
    }

    /// Number of rows (= columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Multiply every entry by a scalar.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            data: self.data.iter().map(|x| x * factor).collect(),
            dim: self.dim,
        }
    }

    /// Entry-wise sum of two matrices of the same dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions differ.
    pub fn add(&self, other: &Self) -> Result<Self, GaussError> {
        self.check_same_dim(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            data,
            dim: self.dim,
        })
    }

    /// Entry-wise difference of two matrices of the same dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions differ.
    pub fn sub(&self, other: &Self) -> Result<Self, GaussError> {
        self.check_same_dim(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            data,
            dim: self.dim,
        })
    }

    /// Matrix-vector product.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector length does not match the
    /// matrix dimension.
    pub fn matvec(&self, x: &[f64]) -> Result<Vec<f64>, GaussError> {
        if x.len() != self.dim {
            return Err(GaussError::DimensionMismatch {
                expected: self.dim,
                got: x.len(),
            });
        }
        let y = (0..self.dim)
            .map(|i| {
                x.iter()
                    .enumerate()
                    .map(|(j, &xj)| self.data[i * self.dim + j] * xj)
                    .sum()
            })
            .collect();
        Ok(y)
    }

    /// Cholesky factorization `A = L·Lᵀ` with `L` lower-triangular.
    ///
    /// Only the lower triangle of the matrix is read; symmetry of the
    /// input is the caller's obligation.
    ///
    /// # Errors
    ///
    /// Returns [`GaussError::SingularMatrix`] if a pivot is not strictly
    /// positive and finite, i.e. the matrix is singular or not
    /// positive-definite.
    pub fn cholesky(&self) -> Result<Cholesky, GaussError> {
        let n = self.dim;
        let mut l = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..=i {
                let mut sum = self.data[i * n + j];
                for k in 0..j {
                    sum -= l[i * n + k] * l[j * n + k];
                }
                if i == j {
                    if sum <= 0.0 || !sum.is_finite() {
                        return Err(GaussError::SingularMatrix {
                            context: format!(
                                "non-positive pivot at row {} of a {}x{} factorization",
                                i, n, n
                            ),
                        });
                    }
                    l[i * n + i] = sum.sqrt();
                } else {
                    l[i * n + j] = sum / l[j * n + j];
                }
            }
        }
        Ok(Cholesky { l, dim: n })
    }

    fn check_same_dim(&self, other: &Self) -> Result<(), GaussError> {
        if self.dim != other.dim {
            return Err(GaussError::DimensionMismatch {
                expected: self.dim,
                got: other.dim,
            });
        }
        Ok(())
    }
}

/// The lower-triangular Cholesky factor of an SPD matrix.
///
/// Solving, inversion, and determinants all reuse the factor, so each
/// operation pays for the O(d³) decomposition once.
#[derive(Debug, Clone)]
pub struct Cholesky {
    /// Lower-triangular factor, row-major; entries above the diagonal
    /// are zero.
    l: Vec<f64>,
    dim: usize,
}

impl Cholesky {
    /// Solve `A·x = b` by forward then backward substitution.
    ///
    /// # Errors
    ///
    /// Returns an error if `b` does not match the factor's dimension.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>, GaussError> {
        if b.len() != self.dim {
            return Err(GaussError::DimensionMismatch {
                expected: self.dim,
                got: b.len(),
            });
        }
        Ok(self.substitute(b))
    }

    /// The inverse of the factored matrix, solved column by column.
    pub fn inverse(&self) -> Matrix {
        let n = self.dim;
        let mut data = vec![0.0; n * n];
        let mut e = vec![0.0; n];
        for j in 0..n {
            e[j] = 1.0;
            let col = self.substitute(&e);
            for i in 0..n {
                data[i * n + j] = col[i];
            }
            e[j] = 0.0;
        }
        Matrix { data, dim: n }
    }

    /// Determinant of the factored matrix: the squared product of the
    /// pivots.
    pub fn determinant(&self) -> f64 {
        let p: f64 = (0..self.dim).map(|i| self.l[i * self.dim + i]).product();
        p * p
    }

    /// Natural log of the determinant; stays finite where
    /// [`Cholesky::determinant`] would overflow or underflow.
    pub fn log_determinant(&self) -> f64 {
        2.0 * (0..self.dim)
            .map(|i| self.l[i * self.dim + i].ln())
            .sum::<f64>()
    }

    // L·y = b forward, then Lᵀ·x = y backward.
    fn substitute(&self, b: &[f64]) -> Vec<f64> {
        let n = self.dim;
        let l = &self.l;

        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum -= l[i * n + k] * y[k];
            }
            y[i] = sum / l[i * n + i];
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for k in (i + 1)..n {
                sum -= l[k * n + i] * x[k];
            }
            x[i] = sum / l[i * n + i];
        }
        x
    }
}
