//! Unified error type for ORBIT.
//!
//! Wraps the per-crate errors so callers of the facade handle one type.

use orbit_core::ParamError;
use orbit_merge::MergeError;
use orbit_safetensors::FormatError;
use thiserror::Error;

/// All ORBIT errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Blend parameters are out of range
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A model file is malformed
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The two models cannot be merged
    #[error("incompatible models: {0}")]
    Incompatible(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (thread pool and the like)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for ORBIT operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the caller can fix this by changing inputs or parameters.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParams(_) | Error::InvalidModel(_) | Error::Incompatible(_)
        )
    }
}

impl From<ParamError> for Error {
    fn from(e: ParamError) -> Self {
        Error::InvalidParams(e.to_string())
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        match e {
            FormatError::Io(io) => Error::Io(io),
            other => Error::InvalidModel(other.to_string()),
        }
    }
}

impl From<MergeError> for Error {
    fn from(e: MergeError) -> Self {
        match e {
            MergeError::Load { path, source } | MergeError::Save { path, source } => match source {
                FormatError::Io(io) => Error::Io(std::io::Error::new(
                    io.kind(),
                    format!("{}: {}", path.display(), io),
                )),
                other => Error::InvalidModel(format!("{}: {}", path.display(), other)),
            },
            e @ MergeError::ShapeMismatch { .. } => Error::Incompatible(e.to_string()),
            MergeError::InvalidParams(p) => p.into(),
            MergeError::Format(f) => f.into(),
            MergeError::ThreadPool(msg) => Error::Internal(msg),
        }
    }
}
