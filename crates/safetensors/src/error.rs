//! SafeTensors errors.

use thiserror::Error;

/// Errors from parsing or encoding a SafeTensors file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Fewer than 8 bytes, so there is no header length
    #[error("SafeTensors file too short: {0} bytes")]
    TooShort(usize),

    /// Header length points past the end of the file or over the limit
    #[error("header length {header_len} exceeds file size {file_len} or limit")]
    HeaderTooLarge {
        /// Declared header length
        header_len: u64,
        /// Actual file length
        file_len: usize,
    },

    /// Header is not UTF-8
    #[error("invalid UTF-8 in header: {0}")]
    InvalidUtf8(String),

    /// Header is not a JSON object
    #[error("failed to parse header JSON: {0}")]
    InvalidJson(String),

    /// A tensor entry is malformed
    #[error("tensor '{name}': {reason}")]
    InvalidEntry {
        /// Tensor name
        name: String,
        /// What is wrong
        reason: String,
    },

    /// A tensor's byte range does not fit in the data section
    #[error("tensor '{name}' data_offsets [{start}, {end}) outside data of {len} bytes")]
    OffsetsOutOfRange {
        /// Tensor name
        name: String,
        /// Declared start
        start: usize,
        /// Declared end
        end: usize,
        /// Data section length
        len: usize,
    },

    /// Byte length does not match shape and dtype
    #[error("tensor '{name}' has {actual} bytes, shape and dtype need {expected}")]
    LengthMismatch {
        /// Tensor name
        name: String,
        /// Bytes implied by shape and dtype
        expected: usize,
        /// Bytes present
        actual: usize,
    },

    /// No tensor with this name
    #[error("tensor not found: {0}")]
    MissingTensor(String),

    /// Tensor exists but is not a floating type
    #[error("tensor '{name}' has non-float dtype {dtype}")]
    UnsupportedDtype {
        /// Tensor name
        name: String,
        /// Dtype tag
        dtype: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    pub(crate) fn entry(name: &str, reason: impl Into<String>) -> Self {
        FormatError::InvalidEntry {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for SafeTensors operations.
pub type Result<T> = std::result::Result<T, FormatError>;
