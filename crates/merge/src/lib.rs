//! Model-level merge: runs the ORBIT blend over every tensor pair of two
//! SafeTensors models and assembles the merged model.
//!
//! ## Per-tensor rules
//!
//! | Tensor in A | In B | Result |
//! |-------------|------|--------|
//! | float | float, same shape | blended, A's dtype |
//! | float | different shape | [`MergeError::ShapeMismatch`] |
//! | any | absent | copied from A |
//! | non-float | any | copied from A |
//! | absent | present | dropped |
//!
//! Tensors are independent, so they are blended in parallel on a rayon pool.
//!
//! ## Usage
//!
//! ```ignore
//! let options = MergeOptions::new().params(BlendParams::default()).threads(4);
//! let summary = merge_files("a.safetensors", "b.safetensors", "out.safetensors", &options, &NoopObserver)?;
//! println!("{}", summary.summary());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod merger;
mod observer;
mod options;
mod summary;

pub use error::{MergeError, Result};
pub use merger::{merge_files, merge_models, CopyReason, TensorOutcome, MERGE_METHOD};
pub use observer::{MergeObserver, NoopObserver};
pub use options::MergeOptions;
pub use summary::MergeSummary;
