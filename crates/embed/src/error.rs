use std::io;
use thiserror::Error;

/// Errors surfaced while generating the action embedding table.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The ONNX text encoder could not be located under the asset directory.
    #[error("model file not found: {0}")]
    ModelNotFound(String),
    /// The tokenizer JSON is missing and there was no remote URL to fetch it from.
    #[error("tokenizer missing: {0}")]
    TokenizerMissing(String),
    /// Configuration is inconsistent (duplicate action ids, zero max length, ...).
    #[error("invalid embed config: {0}")]
    InvalidConfig(String),
    /// Unable to download remote assets.
    #[error("download failed: {0}")]
    Download(String),
    /// Low-level IO failures while touching the filesystem.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// ONNX Runtime or tokenizer errors.
    #[error("inference failure: {0}")]
    Inference(String),
    /// The encoder produced a vector whose norm is zero or not finite, so it cannot be
    /// scaled to unit length.
    #[error("degenerate embedding for action `{id}`: norm is {norm}")]
    DegenerateEmbedding { id: String, norm: f32 },
    /// Vectors in one table must share a single width.
    #[error("embedding for action `{id}` has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },
    /// A stored vector drifted away from unit length.
    #[error("embedding for action `{id}` is not unit length (norm {norm})")]
    NotNormalized { id: String, norm: f32 },
    /// Reading or writing the JSON artifact failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
