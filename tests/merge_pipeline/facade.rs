//! The one-call `orbit::merge` entry point and its error mapping.

use crate::common::*;
use orbit::{BlendParams, Error};

#[test]
fn test_merge_with_default_options() {
    let fx = Fixture::new();
    Model::new().f32("w", &[1.0, 2.0, 3.0], &[3]).save(&fx.a());
    Model::new().f32("w", &[3.0, 2.0, 1.0], &[3]).save(&fx.b());

    let summary = orbit::merge(fx.a(), fx.b(), fx.out(), BlendParams::default()).unwrap();
    assert_eq!(summary.tensors_written(), 1);
    assert!(read(&fx.out()).contains("w"));
}

#[test]
fn test_shape_mismatch_maps_to_incompatible() {
    let fx = Fixture::new();
    Model::new().f32("w", &[1.0, 2.0], &[2]).save(&fx.a());
    Model::new().f32("w", &[1.0, 2.0, 3.0], &[3]).save(&fx.b());

    let err = orbit::merge(fx.a(), fx.b(), fx.out(), BlendParams::default()).unwrap_err();
    assert!(matches!(err, Error::Incompatible(_)));
    assert!(err.is_user_error());
}

#[test]
fn test_missing_file_maps_to_io() {
    let fx = Fixture::new();
    let err = orbit::merge(fx.a(), fx.b(), fx.out(), BlendParams::default()).unwrap_err();
    assert!(matches!(err, Error::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound));
}
