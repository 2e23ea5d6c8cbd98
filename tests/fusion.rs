//! Property tests for canonical-form fusion and defusion.
//!
//! These exercise the algebraic contracts of the composition operators:
//! - fusion commutes and adds precisions
//! - defusion inverts fusion on mean and precision
//! - weights respect the clamp policy exactly
//! - ill-posed operands fail with typed errors, never NaN/Inf results

use std::f64::consts::PI;

use canonical_gauss::{
    CanonicalGaussian, GaussError, Matrix, DENSITY_FLOOR, FUSED_WEIGHT_MIN,
};

const TOL: f64 = 1e-9;

fn well_conditioned_pair() -> (CanonicalGaussian, CanonicalGaussian) {
    let a = CanonicalGaussian::new(
        vec![1.0, -1.0],
        Matrix::from_rows(vec![vec![3.0, 0.5], vec![0.5, 2.0]]).unwrap(),
        1.0,
    )
    .unwrap();
    let b = CanonicalGaussian::new(
        vec![0.5, 0.0],
        Matrix::from_rows(vec![vec![1.0, 0.2], vec![0.2, 0.8]]).unwrap(),
        2.0,
    )
    .unwrap();
    (a, b)
}

// ============================================================================
// Fusion Algebra
// ============================================================================

#[test]
fn fusion_adds_precisions() {
    let (a, b) = well_conditioned_pair();
    let fused = a.fuse(&b).unwrap();

    for i in 0..2 {
        for j in 0..2 {
            let expected = a.precision().get(i, j) + b.precision().get(i, j);
            assert!((fused.precision().get(i, j) - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn fusion_commutes() {
    let (a, b) = well_conditioned_pair();
    let ab = a.fuse(&b).unwrap();
    let ba = b.fuse(&a).unwrap();

    for i in 0..2 {
        assert!((ab.mean()[i] - ba.mean()[i]).abs() < TOL);
        for j in 0..2 {
            assert!((ab.precision().get(i, j) - ba.precision().get(i, j)).abs() < 1e-12);
        }
    }
    assert!((ab.weight() - ba.weight()).abs() < 1e-12 * ab.weight());
}

#[test]
fn defusion_inverts_fusion() {
    let (a, b) = well_conditioned_pair();
    let fused = a.fuse(&b).unwrap();
    let recovered = fused.defuse(&b).unwrap();

    for i in 0..2 {
        assert!((recovered.mean()[i] - a.mean()[i]).abs() < TOL);
        for j in 0..2 {
            assert!((recovered.precision().get(i, j) - a.precision().get(i, j)).abs() < TOL);
        }
    }
}

#[test]
fn fusion_concentrates_the_estimate() {
    let (a, b) = well_conditioned_pair();
    let fused = a.fuse(&b).unwrap();

    // More evidence, tighter distribution: the fused covariance is
    // smaller along every axis than either component's.
    let cov_a = a.covariance().unwrap();
    let cov_fused = fused.covariance().unwrap();
    for i in 0..2 {
        assert!(cov_fused.get(i, i) < cov_a.get(i, i));
    }
}

// ============================================================================
// The Literal Two-Sensor Scenario
// ============================================================================

#[test]
fn two_unit_sensors_meet_in_the_middle() {
    let a = CanonicalGaussian::with_unit_weight(vec![0.0, 0.0], Matrix::identity(2)).unwrap();
    let b = CanonicalGaussian::with_unit_weight(vec![2.0, 0.0], Matrix::identity(2)).unwrap();

    let fused = a.fuse(&b).unwrap();

    assert!((fused.mean()[0] - 1.0).abs() < TOL);
    assert!((fused.mean()[1] - 0.0).abs() < TOL);
    assert!((fused.precision().get(0, 0) - 2.0).abs() < TOL);
    assert!((fused.precision().get(1, 1) - 2.0).abs() < TOL);
    assert!((fused.precision().get(0, 1) - 0.0).abs() < TOL);

    // pdf at the fused mean: sqrt(det(2I)/(2π)²) ≈ 0.3183, times the
    // accumulated weight.
    let density = fused.pdf(&[1.0, 0.0]).unwrap();
    let expected = (4.0 / (2.0 * PI).powi(2)).sqrt() * fused.weight();
    assert!((density - expected).abs() < 1e-12);
    assert!(((4.0f64 / (2.0 * PI).powi(2)).sqrt() - 0.3183).abs() < 1e-4);
}

// ============================================================================
// Weight Policy
// ============================================================================

#[test]
fn pdf_scales_linearly_with_weight() {
    let precision = Matrix::from_rows(vec![vec![2.0, 0.3], vec![0.3, 1.5]]).unwrap();
    let light = CanonicalGaussian::new(vec![0.5, -0.5], precision.clone(), 1.5).unwrap();
    let heavy = CanonicalGaussian::new(vec![0.5, -0.5], precision, 3.0).unwrap();

    for x in [[0.0, 0.0], [0.5, -0.5], [1.0, 2.0]] {
        let lo = light.pdf(&x).unwrap();
        let hi = heavy.pdf(&x).unwrap();
        assert!((hi - 2.0 * lo).abs() < 1e-12 * hi);
    }
}

#[test]
fn fused_weight_floors_at_exact_constant() {
    let a = CanonicalGaussian::new(vec![0.0, 0.0], Matrix::identity(2), 1e-150).unwrap();
    let b = CanonicalGaussian::new(vec![2.0, 0.0], Matrix::identity(2), 1e-150).unwrap();

    // Raw weight ≈ 0.029 · 1e-300, below the fusion clamp floor.
    let fused = a.fuse(&b).unwrap();
    assert_eq!(fused.weight(), FUSED_WEIGHT_MIN);
}

#[test]
fn defused_weight_floors_at_exact_constant() {
    let a = CanonicalGaussian::standard(2);
    let b = CanonicalGaussian::with_unit_weight(vec![2.0, 0.0], Matrix::identity(2)).unwrap();
    let fused = a.fuse(&b).unwrap();

    // Re-tag the fused estimate with a vanishing weight so the defused
    // weight lands far below the floor.
    let faint = CanonicalGaussian::new(
        fused.mean().to_vec(),
        fused.precision().clone(),
        1e-250,
    )
    .unwrap();

    let residual = faint.defuse(&b).unwrap();
    assert_eq!(residual.weight(), DENSITY_FLOOR);
}

#[test]
fn weights_never_negative_or_below_floor() {
    let (a, b) = well_conditioned_pair();
    let fused = a.fuse(&b).unwrap();
    let residual = fused.defuse(&b).unwrap();

    assert!(fused.weight() >= FUSED_WEIGHT_MIN);
    assert!(residual.weight() >= DENSITY_FLOOR);
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn fusing_cancelling_precisions_fails() {
    let a = CanonicalGaussian::standard(2);
    let negated =
        CanonicalGaussian::new(vec![0.0, 0.0], Matrix::identity(2).scale(-1.0), 1.0).unwrap();

    // Summed precision is the zero matrix: a domain error, not NaN.
    let result = a.fuse(&negated);
    assert!(matches!(result, Err(GaussError::SingularMatrix { .. })));
}

#[test]
fn defusing_non_contained_evidence_fails() {
    let a = CanonicalGaussian::standard(2);
    let b =
        CanonicalGaussian::with_unit_weight(vec![0.0, 0.0], Matrix::identity(2).scale(2.0))
            .unwrap();

    // b carries more precision than a: the difference is not
    // positive-definite.
    let result = a.defuse(&b);
    assert!(matches!(result, Err(GaussError::SingularMatrix { .. })));
}

#[test]
fn mismatched_dimensions_fail_everywhere() {
    let two = CanonicalGaussian::standard(2);
    let three = CanonicalGaussian::standard(3);

    assert!(matches!(
        two.fuse(&three),
        Err(GaussError::DimensionMismatch {
            expected: 2,
            got: 3
        })
    ));
    assert!(matches!(
        two.defuse(&three),
        Err(GaussError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        two.pdf(&[0.0]),
        Err(GaussError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        two.log_pdf(&[0.0, 0.0, 0.0]),
        Err(GaussError::DimensionMismatch { .. })
    ));
}

#[test]
fn reverse_defusion_is_unsupported() {
    let (a, b) = well_conditioned_pair();
    assert!(matches!(
        a.defuse_from(&b),
        Err(GaussError::UnsupportedOperation { .. })
    ));
}
