//! Which tensors are blended, copied or dropped, and with what values.

use crate::common::*;
use orbit::{merge_files, BlendParams, DType, MergeError, MergeOptions, NoopObserver};

fn options(params: BlendParams) -> MergeOptions {
    MergeOptions::new().params(params)
}

// ============================================================================
// Blended tensors
// ============================================================================

/// Equal vectors with zero weights leave A untouched
#[test]
fn test_zero_weights_reproduce_a() {
    let fx = Fixture::new();
    Model::new()
        .f32("w", &[1.0, 2.0, 3.0, 4.0], &[2, 2])
        .save(&fx.a());
    Model::new()
        .f32("w", &[4.0, -1.0, 0.5, 2.0], &[2, 2])
        .save(&fx.b());

    let params = BlendParams::default()
        .with_alpha_par(0.0)
        .with_alpha_orth(0.0);
    let summary = merge_files(fx.a(), fx.b(), fx.out(), &options(params), &NoopObserver).unwrap();
    assert_eq!(summary.tensors_blended, 1);

    let out = read(&fx.out()).tensor("w").unwrap();
    assert_eq!(out.data(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(out.shape(), &[2, 2]);
}

/// A = [1,-1,1,-1], B = ones: B is orthogonal to A, so Y = A + B
#[test]
fn test_orthogonal_donor_fully_injected() {
    let fx = Fixture::new();
    Model::new().f32("w", &[1.0, -1.0, 1.0, -1.0], &[4]).save(&fx.a());
    Model::new().f32("w", &[1.0, 1.0, 1.0, 1.0], &[4]).save(&fx.b());

    let params = BlendParams::default()
        .with_alpha_par(0.0)
        .with_alpha_orth(1.0)
        .with_trust_k(10.0);
    merge_files(fx.a(), fx.b(), fx.out(), &options(params), &NoopObserver).unwrap();

    let out = read(&fx.out()).tensor("w").unwrap();
    assert_close(out.data(), &[2.0, 0.0, 2.0, 0.0], 1e-6);
}

/// Trust region caps the step at trust_k * MAD(A)
#[test]
fn test_trust_region_applies_per_tensor() {
    let fx = Fixture::new();
    // MAD([1,2,3,4]) = 1, radius = 0.5
    Model::new().f32("w", &[1.0, 2.0, 3.0, 4.0], &[4]).save(&fx.a());
    Model::new().f32("w", &[100.0, -100.0, 100.0, -100.0], &[4]).save(&fx.b());

    let params = BlendParams::default()
        .with_alpha_par(1.0)
        .with_alpha_orth(1.0)
        .with_trust_k(0.5);
    let summary = merge_files(fx.a(), fx.b(), fx.out(), &options(params), &NoopObserver).unwrap();

    let out = read(&fx.out()).tensor("w").unwrap();
    for (y, a) in out.data().iter().zip([1.0f32, 2.0, 3.0, 4.0]) {
        assert!((y - a).abs() <= 0.5 + 1e-6, "{} strays from {}", y, a);
    }
    assert!(summary.elements_clamped > 0);
}

/// Half-precision tensors come back in their own dtype
#[test]
fn test_half_precision_dtype_preserved() {
    let fx = Fixture::new();
    Model::new()
        .typed("h", &[1.0, 2.0, 3.0, 4.0], &[4], DType::F16)
        .typed("bf", &[0.5, -0.5, 0.25, 1.0], &[2, 2], DType::BF16)
        .save(&fx.a());
    Model::new()
        .typed("h", &[2.0, 1.0, 4.0, 3.0], &[4], DType::F16)
        .typed("bf", &[1.0, 0.0, 0.0, 1.0], &[2, 2], DType::BF16)
        .save(&fx.b());

    merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver).unwrap();

    let out = read(&fx.out());
    assert_eq!(out.view("h").unwrap().dtype, "F16");
    assert_eq!(out.view("bf").unwrap().dtype, "BF16");
    assert_eq!(out.tensor("bf").unwrap().shape(), &[2, 2]);
    assert!(out.tensor("h").unwrap().is_finite());
}

/// F64 tensors merged with themselves come back bit for bit
#[test]
fn test_f64_identity_round_trips_exactly() {
    let fx = Fixture::new();
    let values = [0.1, -0.3, 0.7, 1.0 / 3.0];
    Model::new().f64("d", &values, &[2, 2]).save(&fx.a());
    Model::new().f64("d", &values, &[2, 2]).save(&fx.b());

    let summary = merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver).unwrap();

    let out = read(&fx.out());
    assert_eq!(out.view("d").unwrap().dtype, "F64");
    assert_eq!(out.tensor_as::<f64>("d").unwrap().data(), &values);
    assert_eq!(summary.elements_fallback, 0);
}

/// F64 magnitudes beyond the f32 range are neither lost nor made infinite
#[test]
fn test_f64_large_magnitudes_survive() {
    let fx = Fixture::new();
    let values = [1.0e300, -2.0e300, 3.0e300, 1.0];
    Model::new().f64("d", &values, &[4]).save(&fx.a());
    Model::new().f64("d", &values, &[4]).save(&fx.b());

    merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver).unwrap();

    let merged = read(&fx.out()).tensor_as::<f64>("d").unwrap();
    assert!(merged.is_finite());
    assert_eq!(merged.data(), &values);
}

/// An F64 step below f32 resolution is kept
#[test]
fn test_f64_small_step_not_rounded_away() {
    let fx = Fixture::new();
    Model::new().f64("d", &[1.0, -1.0, 1.0, -1.0], &[4]).save(&fx.a());
    Model::new().f64("d", &[1.0e-12; 4], &[4]).save(&fx.b());
    let params = BlendParams::default()
        .with_alpha_par(0.0)
        .with_alpha_orth(1.0);

    merge_files(fx.a(), fx.b(), fx.out(), &options(params), &NoopObserver).unwrap();

    let merged = read(&fx.out()).tensor_as::<f64>("d").unwrap();
    assert_eq!(merged.data(), &[1.0 + 1.0e-12, -1.0 + 1.0e-12, 1.0 + 1.0e-12, -1.0 + 1.0e-12]);
}

/// The thread count does not change the result
#[test]
fn test_single_thread_matches_default_pool() {
    let fx = Fixture::new();
    let mut a = Model::new();
    let mut b = Model::new();
    for i in 0..8 {
        let base: Vec<f32> = (0..16).map(|j| ((i * 16 + j) as f32 * 0.37).sin()).collect();
        let donor: Vec<f32> = (0..16).map(|j| ((i * 16 + j) as f32 * 0.11).cos()).collect();
        a = a.f32(&format!("layer.{}.weight", i), &base, &[4, 4]);
        b = b.f32(&format!("layer.{}.weight", i), &donor, &[4, 4]);
    }
    a.save(&fx.a());
    b.save(&fx.b());

    let one = fx.path("one.safetensors");
    merge_files(fx.a(), fx.b(), &one, &MergeOptions::new().threads(1), &NoopObserver).unwrap();
    merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver).unwrap();

    assert_eq!(std::fs::read(&one).unwrap(), std::fs::read(fx.out()).unwrap());
}

// ============================================================================
// Copied and dropped tensors
// ============================================================================

/// Tensors missing from B and non-float tensors are copied from A; B-only
/// tensors are left out
#[test]
fn test_copy_and_drop_rules() {
    let fx = Fixture::new();
    Model::new()
        .f32("shared", &[1.0, 2.0], &[2])
        .f32("only_a", &[5.0, 6.0], &[2])
        .i64("position_ids", &[0, 1, 2])
        .save(&fx.a());
    Model::new()
        .f32("shared", &[2.0, 1.0], &[2])
        .f32("only_b", &[9.0], &[1])
        .i64("position_ids", &[7, 8, 9])
        .save(&fx.b());

    let summary =
        merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver).unwrap();
    assert_eq!(summary.tensors_blended, 1);
    assert_eq!(summary.tensors_missing_in_b, 1);
    assert_eq!(summary.tensors_non_float, 1);
    assert_eq!(summary.tensors_dropped, 1);
    assert!(summary.has_issues());

    let out = read(&fx.out());
    assert_eq!(out.names(), vec!["only_a", "position_ids", "shared"]);
    assert_eq!(out.tensor("only_a").unwrap().data(), &[5.0, 6.0]);

    let ids = out.view("position_ids").unwrap();
    assert_eq!(ids.dtype, "I64");
    let expected: Vec<u8> = [0i64, 1, 2].iter().flat_map(|v| v.to_le_bytes()).collect();
    assert_eq!(ids.bytes, expected.as_slice());
}

// ============================================================================
// Failures
// ============================================================================

/// Shared tensor with different shapes aborts the merge and writes nothing
#[test]
fn test_shape_mismatch_is_an_error() {
    let fx = Fixture::new();
    Model::new().f32("w", &[1.0; 6], &[2, 3]).save(&fx.a());
    Model::new().f32("w", &[1.0; 6], &[3, 2]).save(&fx.b());

    let err = merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver)
        .unwrap_err();
    assert!(matches!(err, MergeError::ShapeMismatch { ref name, .. } if name == "w"));
    assert!(!fx.out().exists());
}

/// Missing input file reports which path failed
#[test]
fn test_missing_input_reports_path() {
    let fx = Fixture::new();
    Model::new().f32("w", &[1.0], &[1]).save(&fx.a());

    let err = merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver)
        .unwrap_err();
    assert!(err.to_string().contains("b.safetensors"));
    assert!(!err.is_input_error());
}

/// Corrupt header is an input error
#[test]
fn test_corrupt_input_is_input_error() {
    let fx = Fixture::new();
    Model::new().f32("w", &[1.0], &[1]).save(&fx.a());
    std::fs::write(fx.b(), b"\x05\x00").unwrap();

    let err = merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver)
        .unwrap_err();
    assert!(err.is_input_error());
}

/// Invalid parameters are rejected before any file is written
#[test]
fn test_invalid_params_rejected() {
    let fx = Fixture::new();
    Model::new().f32("w", &[1.0], &[1]).save(&fx.a());
    Model::new().f32("w", &[2.0], &[1]).save(&fx.b());

    let params = BlendParams::default().with_eps(0.0);
    let err = merge_files(fx.a(), fx.b(), fx.out(), &options(params), &NoopObserver).unwrap_err();
    assert!(matches!(err, MergeError::InvalidParams(_)));
    assert!(!fx.out().exists());
}
