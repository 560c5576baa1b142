//! Working element types for tensor buffers.
//!
//! Tensors stored as F32, F16 or BF16 are computed in `f32`; F64 tensors are
//! computed in `f64` so they round-trip without loss.

use crate::dtype::DType;
use half::{bf16, f16};
use num_traits::Float;
use std::cmp::Ordering;
use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A floating type usable as a tensor's working buffer.
///
/// Implemented for `f32` and `f64` only.
pub trait Element: Float + Default + fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    /// Storage type a buffer of this element maps to by default.
    const DTYPE: DType;

    /// Convert from f64, rounding to nearest.
    fn narrow(v: f64) -> Self;

    /// Convert to f64 exactly.
    fn widen(self) -> f64;

    /// IEEE 754 total order.
    fn order(&self, other: &Self) -> Ordering;

    /// Round to the nearest value representable in `dtype`.
    ///
    /// Values outside the type's range become infinite.
    fn round_to(self, dtype: DType) -> Self;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn narrow(v: f64) -> Self {
        v as f32
    }

    fn widen(self) -> f64 {
        self as f64
    }

    fn order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn round_to(self, dtype: DType) -> Self {
        match dtype {
            DType::F32 | DType::F64 => self,
            DType::F16 => f16::from_f32(self).to_f32(),
            DType::BF16 => bf16::from_f32(self).to_f32(),
        }
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn narrow(v: f64) -> Self {
        v
    }

    fn widen(self) -> f64 {
        self
    }

    fn order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn round_to(self, dtype: DType) -> Self {
        match dtype {
            DType::F64 => self,
            DType::F32 => self as f32 as f64,
            DType::F16 => f16::from_f64(self).to_f64(),
            DType::BF16 => bf16::from_f64(self).to_f64(),
        }
    }
}
