use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by [`export_model`](crate::export_model).
#[derive(Debug, Error)]
pub enum ExportError {
    /// The checkpoint does not exist or is not a regular file. Raised before the converter runs.
    #[error("checkpoint not found: {}", .0.display())]
    CheckpointNotFound(PathBuf),
    /// The requested target format identifier is not one the exporter knows.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    /// The converter program could not be started.
    #[error("failed to launch converter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The converter ran and reported failure.
    #[error("converter exited with {}: {stderr}", status_label(.status))]
    ConverterFailed { status: Option<i32>, stderr: String },
    /// The converter reported success but an expected output file is absent.
    #[error("expected export artifact missing: {}", .0.display())]
    MissingArtifact(PathBuf),
    /// Low-level IO failures while touching the filesystem.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

fn status_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".into(),
    }
}
