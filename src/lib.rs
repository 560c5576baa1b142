//! # ORBIT
//!
//! Orthogonal residual blending of model weights.
//!
//! ORBIT merges a donor model B into a base model A one tensor at a time. B is
//! split into the part parallel to A and the orthogonal remainder; A moves a
//! little toward the parallel part, takes in a share of the orthogonal
//! "novelty", and the result is held inside a trust region around A sized by
//! A's median absolute deviation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use orbit::prelude::*;
//!
//! let params = BlendParams::default().with_alpha_orth(0.5);
//! let summary = orbit::merge("a.safetensors", "b.safetensors", "out.safetensors", params)?;
//! println!("{}", summary.summary());
//! ```
//!
//! Single tensors can be blended directly:
//!
//! ```
//! use orbit::{blend, BlendParams, Tensor};
//!
//! let a = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
//! let y = blend(&a, &a, &BlendParams::default());
//! assert_eq!(y, a);
//! ```
//!
//! ## Crates
//!
//! - `orbit-core`: tensors, parameters and the blend itself
//! - `orbit-safetensors`: reading and writing `.safetensors` files
//! - `orbit-merge`: model-level merge over every tensor pair

#![warn(missing_docs)]

mod error;

pub mod prelude;

use std::path::Path;

pub use error::{Error, Result};

pub use orbit_core::{
    blend, blend_slices, blend_with_report, BlendParams, BlendReport, DType, Element, ParamError,
    Tensor,
};
pub use orbit_merge::{
    merge_files, merge_models, CopyReason, MergeError, MergeObserver, MergeOptions, MergeSummary,
    NoopObserver, TensorOutcome, MERGE_METHOD,
};
pub use orbit_safetensors::{FormatError, SafeTensors, SafeTensorsWriter, TensorView};

/// Merge two SafeTensors files with `params` and default options.
pub fn merge(
    model_a: impl AsRef<Path>,
    model_b: impl AsRef<Path>,
    output: impl AsRef<Path>,
    params: BlendParams,
) -> Result<MergeSummary> {
    let options = MergeOptions::new().params(params);
    Ok(merge_files(model_a, model_b, output, &options, &NoopObserver)?)
}
