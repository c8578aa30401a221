//! Workspace umbrella crate for VisionPrep.
//!
//! Offline preparation of the assets the VisionMatrix Android app ships with:
//! the `action_embeddings.json` scene table (see [`embed`]) and the mobile
//! detector weights (see [`export`]). The two binaries `generate-actions` and
//! `export-model` are thin wrappers over [`generate_action_embeddings`] and
//! [`export_model`], configured through [`PrepConfig`].

pub mod config;

pub use crate::config::{ConfigLoadError, PrepConfig, package_root};
pub use embed::{
    ActionPrompt, ActionTable, EmbedConfig, EmbedError, GenerationReport, OnnxTextEncoder,
    PromptTokenizer, StubTextEncoder, TextEncoder, default_actions, embed_actions,
    generate_action_embeddings,
};
pub use export::{
    ExportArtifacts, ExportConfig, ExportError, ExportFormat, ModelConverter, UltralyticsCli,
    converter_from_config, export_model,
};

use std::error::Error;

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber for a binary.
///
/// `RUST_LOG` takes precedence over `cfg.log_level`. Fails if a subscriber is already set.
pub fn init_tracing(cfg: &PrepConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if cfg.log_format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
