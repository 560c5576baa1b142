//! Little-endian element codecs for floating dtypes.

use half::{bf16, f16};
use orbit_core::{DType, Element};

/// Decode raw little-endian bytes of `dtype` into working values of `T`.
///
/// Decoding F64 into `f32` narrows each value; decode into `f64` to keep it.
/// Trailing bytes that do not form a whole element are ignored; callers check
/// lengths up front.
pub fn decode<T: Element>(bytes: &[u8], dtype: DType) -> Vec<T> {
    match dtype {
        DType::F32 => bytes
            .chunks_exact(4)
            .map(|c| T::narrow(f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64))
            .collect(),
        DType::F16 => bytes
            .chunks_exact(2)
            .map(|c| T::narrow(f16::from_le_bytes([c[0], c[1]]).to_f64()))
            .collect(),
        DType::BF16 => bytes
            .chunks_exact(2)
            .map(|c| T::narrow(bf16::from_le_bytes([c[0], c[1]]).to_f64()))
            .collect(),
        DType::F64 => bytes
            .chunks_exact(8)
            .map(|c| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(c);
                T::narrow(f64::from_le_bytes(raw))
            })
            .collect(),
    }
}

/// Encode working values as little-endian bytes of `dtype`.
pub fn encode<T: Element>(values: &[T], dtype: DType) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * dtype.size_in_bytes());
    match dtype {
        DType::F32 => {
            for &v in values {
                out.extend_from_slice(&(v.widen() as f32).to_le_bytes());
            }
        }
        DType::F16 => {
            for &v in values {
                out.extend_from_slice(&f16::from_f64(v.widen()).to_le_bytes());
            }
        }
        DType::BF16 => {
            for &v in values {
                out.extend_from_slice(&bf16::from_f64(v.widen()).to_le_bytes());
            }
        }
        DType::F64 => {
            for &v in values {
                out.extend_from_slice(&v.widen().to_le_bytes());
            }
        }
    }
    out
}
