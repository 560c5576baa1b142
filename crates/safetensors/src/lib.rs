//! SafeTensors binary format.
//!
//! Layout: 8-byte header length (u64 LE), a JSON header describing each
//! tensor's dtype, shape and byte range, then the raw little-endian tensor
//! data. An optional `__metadata__` entry holds a string-to-string map.
//!
//! Floating tensors (`F32`, `F16`, `BF16`, `F64`) decode to
//! [`orbit_core::Tensor`]. Anything else is exposed as raw bytes through
//! [`TensorView`] so it can be copied into an output file unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod codec;
mod error;
mod reader;
mod writer;

pub use codec::{decode, encode};
pub use error::{FormatError, Result};
pub use reader::{SafeTensors, TensorView};
pub use writer::SafeTensorsWriter;

/// Header key holding the string metadata map.
pub const METADATA_KEY: &str = "__metadata__";

/// Largest header accepted, in bytes.
pub const MAX_HEADER_LEN: usize = 100_000_000;

/// Bytes per element for a dtype tag, if the tag is known.
pub fn element_size(dtype: &str) -> Option<usize> {
    match dtype {
        "BOOL" | "U8" | "I8" | "F8_E4M3" | "F8_E5M2" => Some(1),
        "U16" | "I16" | "F16" | "BF16" => Some(2),
        "U32" | "I32" | "F32" => Some(4),
        "U64" | "I64" | "F64" => Some(8),
        _ => None,
    }
}
