//! Model errors

use thiserror::Error;

use crate::logic::features::LayoutMismatchError;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact path does not exist
    #[error("model artifact not found: {0}")]
    NotFound(String),

    /// Artifact exists but cannot be read
    #[error("model artifact unreadable: {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not a valid XGBoost JSON model
    #[error("model artifact malformed: {0}")]
    Malformed(String),

    /// Valid model, but uses something this engine does not evaluate
    #[error("unsupported model: {0}")]
    Unsupported(String),

    /// Artifact bytes do not match the pinned SHA-256
    #[error("model checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Feature schema of the artifact or of a vector disagrees with the layout
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Malformed(err.to_string())
    }
}

impl From<LayoutMismatchError> for ModelError {
    fn from(err: LayoutMismatchError) -> Self {
        ModelError::SchemaMismatch(err.to_string())
    }
}
