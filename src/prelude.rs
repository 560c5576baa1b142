//! Convenient imports for ORBIT.
//!
//! ```ignore
//! use orbit::prelude::*;
//!
//! let params = BlendParams::default();
//! let merged = blend(&a, &b, &params);
//! ```

// Error handling
pub use crate::error::{Error, Result};

// Tensor blending
pub use orbit_core::{blend, blend_with_report, BlendParams, BlendReport, DType, Tensor};

// Model merging
pub use orbit_merge::{merge_files, MergeObserver, MergeOptions, MergeSummary};
