//! Floating element types a [`Tensor`](crate::Tensor) can carry.

use crate::element::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a tensor as stored on disk.
///
/// The element type decides how working values are rounded and encoded.
/// F64 tensors use an `f64` working buffer, every other type uses `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    /// IEEE 754 binary32
    F32,
    /// IEEE 754 binary16
    F16,
    /// bfloat16
    BF16,
    /// IEEE 754 binary64
    F64,
}

impl DType {
    /// Parse a SafeTensors dtype tag (`"F32"`, `"F16"`, `"BF16"`, `"F64"`).
    ///
    /// Returns `None` for tags that are not floating point.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "F32" => Some(DType::F32),
            "F16" => Some(DType::F16),
            "BF16" => Some(DType::BF16),
            "F64" => Some(DType::F64),
            _ => None,
        }
    }

    /// The SafeTensors dtype tag.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "F32",
            DType::F16 => "F16",
            DType::BF16 => "BF16",
            DType::F64 => "F64",
        }
    }

    /// Bytes per element on disk.
    pub fn size_in_bytes(self) -> usize {
        match self {
            DType::F16 | DType::BF16 => 2,
            DType::F32 => 4,
            DType::F64 => 8,
        }
    }

    /// Round an `f32` working value to the nearest value representable in
    /// this type.
    ///
    /// Values outside the type's range become infinite.
    pub fn round(self, v: f32) -> f32 {
        v.round_to(self)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
