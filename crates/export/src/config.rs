use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ExportError, ExportFormat};

/// Which checkpoint to convert, into what, and with which converter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Trained detection checkpoint. Relative paths are resolved against
    /// [`base_dir`](Self::base_dir), never the working directory.
    pub checkpoint_path: PathBuf,
    /// Anchor for a relative checkpoint path. Defaults to this crate's manifest directory;
    /// a relative anchor is itself taken from there.
    pub base_dir: Option<PathBuf>,
    /// Target format identifier (`"ncnn"`, `"onnx"`, `"torchscript"`).
    pub format: String,
    /// Ultralytics CLI entry point.
    pub converter_program: String,
    /// Optional square input size forwarded as `imgsz=`.
    pub image_size: Option<u32>,
    /// Export FP16 weights (`half=True`).
    pub half: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            checkpoint_path: PathBuf::from("models/yolov8n.pt"),
            base_dir: None,
            format: "ncnn".into(),
            converter_program: "yolo".into(),
            image_size: None,
            half: false,
        }
    }
}

impl ExportConfig {
    pub fn resolved_checkpoint_path(&self) -> PathBuf {
        if self.checkpoint_path.is_absolute() {
            return self.checkpoint_path.clone();
        }
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let base = match &self.base_dir {
            Some(base) => manifest_dir.join(base),
            None => manifest_dir,
        };
        base.join(&self.checkpoint_path)
    }

    pub fn target_format(&self) -> Result<ExportFormat, ExportError> {
        self.format.parse()
    }
}
