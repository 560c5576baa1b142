//! Merge errors.

use orbit_core::ParamError;
use orbit_safetensors::FormatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// An input model could not be read or parsed
    #[error("failed to load {}: {source}", path.display())]
    Load {
        /// Model path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: FormatError,
    },

    /// The merged model could not be written
    #[error("failed to save {}: {source}", path.display())]
    Save {
        /// Output path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: FormatError,
    },

    /// A tensor present in both models has different shapes
    #[error("shape mismatch for tensor '{name}': {a:?} in model A, {b:?} in model B")]
    ShapeMismatch {
        /// Tensor name
        name: String,
        /// Shape in model A
        a: Vec<usize>,
        /// Shape in model B
        b: Vec<usize>,
    },

    /// Blend parameters failed validation
    #[error("invalid blend parameters: {0}")]
    InvalidParams(#[from] ParamError),

    /// Tensor decode/encode error
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Worker pool could not be built
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

impl MergeError {
    /// Whether the error comes from the inputs or configuration rather than
    /// from the environment (disk, threads).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MergeError::ShapeMismatch { .. }
                | MergeError::InvalidParams(_)
                | MergeError::Format(_)
                | MergeError::Load {
                    source: FormatError::TooShort(_)
                        | FormatError::HeaderTooLarge { .. }
                        | FormatError::InvalidUtf8(_)
                        | FormatError::InvalidJson(_)
                        | FormatError::InvalidEntry { .. }
                        | FormatError::OffsetsOutOfRange { .. }
                        | FormatError::LengthMismatch { .. },
                    ..
                }
        )
    }
}

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
