//! Exports the trained YOLOv8 checkpoint for on-device inference (ncnn by default).

use anyhow::Context;
use visionprep::{PrepConfig, converter_from_config, export_model, init_tracing};

fn main() -> anyhow::Result<()> {
    let config = PrepConfig::load().context("failed to load configuration")?;
    init_tracing(&config).map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let converter = converter_from_config(&config.export);
    let artifacts = export_model(&config.export, &converter).with_context(|| {
        format!(
            "failed to export {}",
            config.export.resolved_checkpoint_path().display()
        )
    })?;

    for file in &artifacts.files {
        tracing::info!(format = %artifacts.format, "wrote {}", file.display());
    }
    Ok(())
}
