//! Generates `action_embeddings.json` for the Android app.
//!
//! Settings come from `visionprep.{yaml,toml,json}` in the package root and
//! `VISIONPREP__EMBED__*` environment variables; with neither present the
//! stock MobileCLIP-S0 layout and the five built-in scene prompts are used.

use anyhow::Context;
use visionprep::{PrepConfig, generate_action_embeddings, init_tracing};

fn main() -> anyhow::Result<()> {
    let config = PrepConfig::load().context("failed to load configuration")?;
    init_tracing(&config).map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let report = generate_action_embeddings(&config.embed).with_context(|| {
        format!(
            "failed to generate action embeddings from {}",
            config.embed.model_path().display()
        )
    })?;

    tracing::info!(
        model = %report.model_name,
        entries = report.entries,
        dimension = report.dimension,
        "saved {}",
        report.output_path.display()
    );
    Ok(())
}
