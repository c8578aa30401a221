//! Detection model export
//!
//! Converts a trained YOLOv8 checkpoint into a format the phone can run
//! efficiently, by default ncnn (a `.param` graph file plus a `.bin` weights
//! file). The conversion itself is delegated to an existing exporter behind the
//! [`ModelConverter`] trait; this crate only checks the input, runs the
//! converter and confirms the expected files exist afterwards.
//!
//! ```no_run
//! use export::{export_model, ExportConfig, UltralyticsCli};
//!
//! let cfg = ExportConfig {
//!     checkpoint_path: "/models/yolov8n.pt".into(),
//!     ..Default::default()
//! };
//! let artifacts = export_model(&cfg, &UltralyticsCli::default()).unwrap();
//! for file in &artifacts.files {
//!     println!("{}", file.display());
//! }
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod format;

pub use crate::config::ExportConfig;
pub use crate::converter::{ModelConverter, UltralyticsCli};
pub use crate::error::ExportError;
pub use crate::format::ExportFormat;

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Files produced by one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifacts {
    pub format: ExportFormat,
    pub checkpoint: PathBuf,
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Builds the CLI converter described by `cfg`.
pub fn converter_from_config(cfg: &ExportConfig) -> UltralyticsCli {
    UltralyticsCli::new(&cfg.converter_program)
        .with_image_size(cfg.image_size)
        .with_half(cfg.half)
}

/// Exports the configured checkpoint with `converter`.
///
/// The checkpoint and format are checked before the converter runs, so a bad path never
/// leaves files behind. Re-running overwrites earlier output.
pub fn export_model<C>(cfg: &ExportConfig, converter: &C) -> Result<ExportArtifacts, ExportError>
where
    C: ModelConverter + ?Sized,
{
    let format = cfg.target_format()?;
    let checkpoint = cfg.resolved_checkpoint_path();
    if !checkpoint.is_file() {
        return Err(ExportError::CheckpointNotFound(checkpoint));
    }

    info!(checkpoint = %checkpoint.display(), %format, "exporting model");
    converter.convert(&checkpoint, format)?;

    let (output_dir, files) = format.expected_artifacts(&checkpoint);
    if let Some(missing) = files.iter().find(|f| !f.is_file()) {
        return Err(ExportError::MissingArtifact(missing.clone()));
    }

    info!(output = %output_dir.display(), files = files.len(), "export complete");
    Ok(ExportArtifacts {
        format,
        checkpoint,
        output_dir,
        files,
    })
}
