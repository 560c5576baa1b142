//! Header metadata carried into merged files.

use crate::common::*;
use orbit::{merge_files, MergeOptions, NoopObserver, MERGE_METHOD};

/// A's metadata is kept and the merge method is recorded
#[test]
fn test_metadata_from_a_is_kept() {
    let fx = Fixture::new();
    Model::new()
        .f32("w", &[1.0, 2.0], &[2])
        .meta("format", "pt")
        .save(&fx.a());
    Model::new()
        .f32("w", &[2.0, 1.0], &[2])
        .meta("source", "donor")
        .save(&fx.b());

    merge_files(fx.a(), fx.b(), fx.out(), &MergeOptions::new(), &NoopObserver).unwrap();

    let meta = read(&fx.out()).metadata().clone();
    assert_eq!(meta.get("format").map(String::as_str), Some("pt"));
    assert_eq!(meta.get("merge_method").map(String::as_str), Some(MERGE_METHOD));
    assert!(meta.get("source").is_none());

    let params: serde_json::Value = serde_json::from_str(&meta["merge_params"]).unwrap();
    assert!(params.get("alpha_orth").is_some());
}

/// With keep_metadata off only the merge entries remain
#[test]
fn test_metadata_can_be_dropped() {
    let fx = Fixture::new();
    Model::new()
        .f32("w", &[1.0, 2.0], &[2])
        .meta("format", "pt")
        .save(&fx.a());
    Model::new().f32("w", &[2.0, 1.0], &[2]).save(&fx.b());

    let options = MergeOptions::new().keep_metadata(false);
    merge_files(fx.a(), fx.b(), fx.out(), &options, &NoopObserver).unwrap();

    let meta = read(&fx.out()).metadata().clone();
    assert!(meta.get("format").is_none());
    assert_eq!(meta.get("merge_method").map(String::as_str), Some(MERGE_METHOD));
}
