use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::ExportError;

/// Target formats the Ultralytics exporter can produce that this tool knows how to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Tencent ncnn: `model.ncnn.param` (graph) + `model.ncnn.bin` (weights).
    Ncnn,
    /// Single `.onnx` graph.
    Onnx,
    /// Single `.torchscript` archive.
    TorchScript,
}

impl ExportFormat {
    /// Identifier passed to the converter as `format=<id>`.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Ncnn => "ncnn",
            ExportFormat::Onnx => "onnx",
            ExportFormat::TorchScript => "torchscript",
        }
    }

    /// Where the exporter drops its output for `checkpoint`, and the files it must contain.
    ///
    /// Outputs land beside the checkpoint: ncnn gets its own `<stem>_ncnn_model/` directory,
    /// single-file formats reuse the checkpoint stem.
    pub fn expected_artifacts(self, checkpoint: &Path) -> (PathBuf, Vec<PathBuf>) {
        let parent = checkpoint
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let stem = checkpoint
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".into());

        match self {
            ExportFormat::Ncnn => {
                let dir = parent.join(format!("{stem}_ncnn_model"));
                let files = vec![dir.join("model.ncnn.param"), dir.join("model.ncnn.bin")];
                (dir, files)
            }
            ExportFormat::Onnx => {
                let file = parent.join(format!("{stem}.onnx"));
                (parent, vec![file])
            }
            ExportFormat::TorchScript => {
                let file = parent.join(format!("{stem}.torchscript"));
                (parent, vec![file])
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ncnn" => Ok(ExportFormat::Ncnn),
            "onnx" => Ok(ExportFormat::Onnx),
            "torchscript" => Ok(ExportFormat::TorchScript),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}
