//! Action embedding generation
//!
//! Turns a small, hand-authored table of scene prompts into the
//! `action_embeddings.json` lookup table the Android app ships in its assets.
//! Each prompt is tokenized to a fixed 77-token CLIP sequence, pushed through
//! the MobileCLIP text encoder, L2-normalized and written under its business id.
//! The app then picks a scene by cosine similarity against an image embedding.
//!
//! Two encoders are available:
//!
//! - **ONNX mode** - Run the exported text encoder locally. Requires the model file.
//! - **Stub mode** - Deterministic hash-derived vectors. No model needed; handy for
//!   wiring tests and checking the output format.
//!
//! Everything is blocking and runs on the calling thread. Nothing is written until
//! every prompt has been embedded and the table passed validation.
//!
//! ## Quick example
//!
//! ```no_run
//! use embed::{generate_action_embeddings, EmbedConfig};
//!
//! let report = generate_action_embeddings(&EmbedConfig::default()).unwrap();
//! assert_eq!(report.entries, 5);
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod types;

mod assets;
mod normalize;
mod onnx;
mod stub;
mod tokenize;

pub use crate::config::{default_actions, EmbedConfig, CLIP_MAX_LENGTH, CLIP_PAD_TOKEN};
pub use crate::encoder::TextEncoder;
pub use crate::error::EmbedError;
pub use crate::normalize::{l2_norm, l2_normalize_in_place};
pub use crate::onnx::OnnxTextEncoder;
pub use crate::stub::StubTextEncoder;
pub use crate::tokenize::PromptTokenizer;
pub use crate::types::{ActionPrompt, ActionTable, EncodedPrompt, GenerationReport};

use std::collections::HashSet;
use tracing::{debug, info};

use crate::assets::resolve_model_assets;

/// Runs the full pipeline described by `cfg` and writes the table next to the encoder.
///
/// Any failure (missing encoder, tokenizer problems, a degenerate vector) aborts before the
/// output file is touched.
pub fn generate_action_embeddings(cfg: &EmbedConfig) -> Result<GenerationReport, EmbedError> {
    cfg.validate()?;

    // --- Asset resolution ---
    let assets = resolve_model_assets(cfg)?;
    info!(
        model = %assets.model_path.display(),
        mode = %cfg.mode,
        actions = cfg.actions.len(),
        "generating action embeddings"
    );

    let tokenizer =
        PromptTokenizer::from_file(&assets.tokenizer_path, cfg.max_length, &cfg.pad_token)?;

    // --- Encoder selection ---
    let mut encoder: Box<dyn TextEncoder> = match cfg.mode.as_str() {
        "stub" => Box::new(StubTextEncoder::new(cfg.stub_dim)),
        "onnx" => Box::new(OnnxTextEncoder::load(&assets.model_path)?),
        other => {
            return Err(EmbedError::InvalidConfig(format!(
                "unknown embed mode `{other}` (expected `onnx` or `stub`)"
            )))
        }
    };

    // --- Inference ---
    let table = embed_actions(&tokenizer, &mut encoder, &cfg.actions)?;
    let dimension = table.validate(cfg.norm_tolerance)?;

    // --- Output ---
    table.write_json(&assets.output_path)?;
    info!(
        path = %assets.output_path.display(),
        entries = table.len(),
        dimension,
        "wrote action embeddings"
    );

    Ok(GenerationReport {
        model_name: cfg.model_name.clone(),
        model_path: assets.model_path,
        output_path: assets.output_path,
        entries: table.len(),
        dimension,
    })
}

/// Embeds every prompt in order and returns the normalized table.
///
/// Ids must be unique; a repeated id is rejected before anything is encoded. All vectors must
/// share the width of the first one. A zero or non-finite norm is reported as
/// [`EmbedError::DegenerateEmbedding`] rather than written out as NaNs.
pub fn embed_actions<E>(
    tokenizer: &PromptTokenizer,
    encoder: &mut E,
    prompts: &[ActionPrompt],
) -> Result<ActionTable, EmbedError>
where
    E: TextEncoder + ?Sized,
{
    let mut seen = HashSet::with_capacity(prompts.len());
    if let Some(dup) = prompts.iter().find(|p| !seen.insert(p.id.as_str())) {
        return Err(EmbedError::InvalidConfig(format!(
            "duplicate action id `{}`",
            dup.id
        )));
    }

    let mut table = ActionTable::with_capacity(prompts.len());
    let mut expected_dim: Option<usize> = None;

    for action in prompts {
        let encoded = tokenizer.encode(&action.prompt)?;
        let mut vector = encoder.embed(&encoded)?;

        match expected_dim {
            Some(expected) if expected != vector.len() => {
                return Err(EmbedError::DimensionMismatch {
                    id: action.id.clone(),
                    expected,
                    actual: vector.len(),
                });
            }
            None => expected_dim = Some(vector.len()),
            _ => {}
        }

        let norm = l2_normalize_in_place(&mut vector);
        if !(norm.is_finite() && norm > 0.0) {
            return Err(EmbedError::DegenerateEmbedding {
                id: action.id.clone(),
                norm,
            });
        }
        debug!(
            id = %action.id,
            tokens = encoded.real_tokens(),
            dim = vector.len(),
            norm,
            "embedded action prompt"
        );

        table.insert(action.id.clone(), vector);
    }

    Ok(table)
}
