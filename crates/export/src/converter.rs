use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::{ExportError, ExportFormat};

/// An existing conversion routine: reads the checkpoint and writes the converted files to disk.
pub trait ModelConverter {
    fn convert(&self, checkpoint: &Path, format: ExportFormat) -> Result<(), ExportError>;
}

/// Runs `yolo export model=<checkpoint> format=<id>` as a blocking child process.
///
/// The exporter writes its output beside the checkpoint; see
/// [`ExportFormat::expected_artifacts`].
#[derive(Debug, Clone)]
pub struct UltralyticsCli {
    program: PathBuf,
    image_size: Option<u32>,
    half: bool,
}

impl UltralyticsCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            image_size: None,
            half: false,
        }
    }

    pub fn with_image_size(mut self, image_size: Option<u32>) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn with_half(mut self, half: bool) -> Self {
        self.half = half;
        self
    }

    /// Arguments after the program name.
    pub fn args(&self, checkpoint: &Path, format: ExportFormat) -> Vec<String> {
        let mut args = vec![
            "export".to_string(),
            format!("model={}", checkpoint.display()),
            format!("format={}", format.as_str()),
        ];
        if let Some(size) = self.image_size {
            args.push(format!("imgsz={size}"));
        }
        if self.half {
            args.push("half=True".into());
        }
        args
    }
}

impl Default for UltralyticsCli {
    fn default() -> Self {
        Self::new("yolo")
    }
}

impl ModelConverter for UltralyticsCli {
    fn convert(&self, checkpoint: &Path, format: ExportFormat) -> Result<(), ExportError> {
        // The child runs from the checkpoint's directory, so `model=` must not be relative.
        let checkpoint = std::path::absolute(checkpoint)?;
        let checkpoint = checkpoint.as_path();
        let args = self.args(checkpoint, format);
        let mut command = Command::new(&self.program);
        command.args(&args);
        if let Some(parent) = checkpoint.parent().filter(|p| !p.as_os_str().is_empty()) {
            command.current_dir(parent);
        }

        debug!(program = %self.program.display(), ?args, "running converter");
        let output = command.output().map_err(|source| ExportError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(target: "export::converter", "{line}");
        }

        if !output.status.success() {
            return Err(ExportError::ConverterFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
