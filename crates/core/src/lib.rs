//! Core numerics for ORBIT (Orthogonal Residual Blend In Tensors).
//!
//! This crate owns the tensor type and the blend kernel. It performs no I/O
//! and does not log; model files and the per-tensor loop live in
//! `orbit-safetensors` and `orbit-merge`.
//!
//! ## The blend
//!
//! Given an anchor tensor `A` and a donor tensor `B` of the same shape, `B` is
//! split into a component along `A` and a component orthogonal to it:
//!
//! ```text
//! coef   = <B,A> / max(<A,A>, eps)          (optionally clipped)
//! B_par  = coef * A
//! B_orth = B - B_par
//! Y0     = A + alpha_par * (B_par - A) + alpha_orth * B_orth
//! Y      = A + clamp(Y0 - A, ±trust_k * max(MAD(A), eps))
//! ```
//!
//! and any element that comes out non-finite is replaced by `A`'s element.
//!
//! ```
//! use orbit_core::{blend, BlendParams, Tensor};
//!
//! let a = Tensor::from_slice(&[1.0, -1.0, 1.0, -1.0], &[2, 2]);
//! let b = Tensor::from_slice(&[1.0, 1.0, 1.0, 1.0], &[2, 2]);
//! let params = BlendParams::default()
//!     .with_alpha_par(0.0)
//!     .with_alpha_orth(1.0)
//!     .with_trust_k(10.0);
//!
//! let y = blend(&a, &b, &params);
//! assert_eq!(y.data(), &[2.0, 0.0, 2.0, 0.0]);
//! assert_eq!(y.shape(), a.shape());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blend;
pub mod dtype;
pub mod element;
pub mod params;
pub mod stats;
pub mod tensor;

pub use blend::{blend, blend_slices, blend_with_report, BlendReport};
pub use dtype::DType;
pub use element::Element;
pub use params::{BlendParams, ParamError};
pub use tensor::Tensor;
