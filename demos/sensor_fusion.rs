//! Fusing independent sensor estimates in canonical form.
//!
//! Run with: cargo run --example sensor_fusion
//!
//! This example demonstrates:
//! - Building canonical-form Gaussians from precision or moment form
//! - Fusion as Bayesian combination of independent evidence
//! - Defusion as evidence removal (the inverse operator)
//! - Weighted density evaluation with the underflow floor
//!
//! Key insight: in information form, combining estimates is arithmetic.
//! Precisions add, and the weight tracks how well the sources agree.

use canonical_gauss::{CanonicalGaussian, Matrix};

fn print_gaussian(label: &str, g: &CanonicalGaussian) {
    println!("{label}:");
    println!("  mean      {:?}", g.mean());
    for i in 0..g.dim() {
        let row: Vec<f64> = (0..g.dim()).map(|j| g.precision().get(i, j)).collect();
        if i == 0 {
            println!("  precision {row:?}");
        } else {
            println!("            {row:?}");
        }
    }
    println!("  weight    {:.6e}", g.weight());
    println!();
}

fn main() {
    println!("=== Canonical-Form Sensor Fusion ===\n");

    // -------------------------------------------------------------------------
    // 1. Two independent estimates of the same 2-D position
    // -------------------------------------------------------------------------
    println!("1. Two Independent Estimates");
    println!("----------------------------\n");

    // A radar fix, fairly confident on both axes.
    let radar = CanonicalGaussian::with_unit_weight(
        vec![0.0, 0.0],
        Matrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 2.0]]).unwrap(),
    )
    .unwrap();

    // A camera fix, built from moment form: looser, slightly correlated.
    let camera = CanonicalGaussian::from_moments(
        vec![1.2, 0.4],
        Matrix::from_rows(vec![vec![1.0, 0.3], vec![0.3, 2.0]]).unwrap(),
        1.0,
    )
    .unwrap();

    print_gaussian("Radar", &radar);
    print_gaussian("Camera", &camera);

    // -------------------------------------------------------------------------
    // 2. Fusion: multiply the densities
    // -------------------------------------------------------------------------
    println!("2. Fusion");
    println!("---------\n");

    let combined = radar.fuse(&camera).unwrap();
    print_gaussian("Radar x Camera", &combined);
    println!("The fused mean sits between the fixes, pulled toward the");
    println!("more precise radar; the weight is the Gaussian-product");
    println!("constant measuring how well the two sources agree.\n");

    // Fusion is commutative.
    let reversed = camera.fuse(&radar).unwrap();
    println!(
        "Commutativity check: |mean diff| = {:.3e}\n",
        (combined.mean()[0] - reversed.mean()[0]).abs()
    );

    // -------------------------------------------------------------------------
    // 3. Defusion: remove one component again
    // -------------------------------------------------------------------------
    println!("3. Defusion");
    println!("-----------\n");

    let residual = combined.defuse(&camera).unwrap();
    print_gaussian("(Radar x Camera) / Camera", &residual);
    println!("Mean and precision recover the radar fix.\n");

    // -------------------------------------------------------------------------
    // 4. Density evaluation
    // -------------------------------------------------------------------------
    println!("4. Density Evaluation");
    println!("---------------------\n");

    let at_mean = combined.pdf(combined.mean()).unwrap();
    let far_away = combined.pdf(&[50.0, -50.0]).unwrap();
    println!("pdf at fused mean:  {at_mean:.6e}");
    println!("pdf far away:       {far_away:.6e}  (floored, never zero)");
    println!(
        "log-pdf at mean:    {:.6}  (normalized; weight excluded)",
        combined.log_pdf(combined.mean()).unwrap()
    );
}
