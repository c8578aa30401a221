use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::types::ActionPrompt;
use crate::EmbedError;

/// Token length every CLIP text prompt is padded or truncated to.
pub const CLIP_MAX_LENGTH: usize = 77;

/// Padding token used by the CLIP BPE vocabulary.
pub const CLIP_PAD_TOKEN: &str = "<|endoftext|>";

/// Runtime configuration describing which encoder/tokenizer to use and where the table lands.
///
/// Every field has a compiled-in default, so `EmbedConfig::default()` reproduces the stock
/// MobileCLIP-S0 asset layout with the five built-in scene prompts.
///
/// # Example
/// ```no_run
/// use embed::{generate_action_embeddings, EmbedConfig};
///
/// let cfg = EmbedConfig {
///     asset_dir: "/opt/android/app/src/main/assets/mobileclip_s0".into(),
///     ..Default::default()
/// };
///
/// let report = generate_action_embeddings(&cfg).unwrap();
/// println!("wrote {}", report.output_path.display());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbedConfig {
    /// Encoder selector: `"onnx"` (local model) or `"stub"` (deterministic vectors, no model).
    pub mode: String,
    /// Friendly label surfaced in logs and the generation report.
    pub model_name: String,
    /// Directory holding the encoder, the tokenizer and the generated JSON. Relative paths
    /// are resolved against [`base_dir`](Self::base_dir), never the working directory.
    pub asset_dir: PathBuf,
    /// Anchor for a relative [`asset_dir`](Self::asset_dir). Defaults to this crate's
    /// manifest directory; a relative anchor is itself taken from there.
    pub base_dir: Option<PathBuf>,
    /// File name of the ONNX text encoder inside the asset directory.
    pub model_file: String,
    /// File name of `tokenizer.json` inside the asset directory.
    pub tokenizer_file: String,
    /// Optional HTTPS URL fetched when the tokenizer is not present locally.
    pub tokenizer_url: Option<String>,
    /// Timeout for the tokenizer download.
    pub download_timeout_secs: u64,
    /// File name of the generated table, written next to the encoder.
    pub output_file: String,
    /// Fixed token length of every prompt.
    pub max_length: usize,
    /// Token used to pad prompts up to [`max_length`](Self::max_length).
    pub pad_token: String,
    /// Accepted deviation of each stored vector's norm from 1.0.
    pub norm_tolerance: f32,
    /// Vector width produced in `"stub"` mode (MobileCLIP-S0 emits 512).
    pub stub_dim: usize,
    /// Business identifier → prompt text, in output order.
    pub actions: Vec<ActionPrompt>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            mode: "onnx".into(),
            model_name: "mobileclip_s0".into(),
            asset_dir: PathBuf::from("assets/mobileclip_s0"),
            base_dir: None,
            model_file: "text_model_uint8.onnx".into(),
            tokenizer_file: "tokenizer.json".into(),
            tokenizer_url: Some(
                "https://huggingface.co/openai/clip-vit-base-patch32/resolve/main/tokenizer.json"
                    .into(),
            ),
            download_timeout_secs: 30,
            output_file: "action_embeddings.json".into(),
            max_length: CLIP_MAX_LENGTH,
            pad_token: CLIP_PAD_TOKEN.into(),
            norm_tolerance: 1e-5,
            stub_dim: 512,
            actions: default_actions(),
        }
    }
}

impl EmbedConfig {
    /// Absolute asset directory, anchored at [`base_dir`](Self::base_dir) when relative.
    pub fn resolved_asset_dir(&self) -> PathBuf {
        if self.asset_dir.is_absolute() {
            return self.asset_dir.clone();
        }
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let base = match &self.base_dir {
            Some(base) => manifest_dir.join(base),
            None => manifest_dir,
        };
        base.join(&self.asset_dir)
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolved_asset_dir().join(&self.model_file)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.resolved_asset_dir().join(&self.tokenizer_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolved_asset_dir().join(&self.output_file)
    }

    /// Rejects configurations that cannot produce a well-formed table.
    pub fn validate(&self) -> Result<(), EmbedError> {
        if self.actions.is_empty() {
            return Err(EmbedError::InvalidConfig("no actions configured".into()));
        }
        if self.max_length == 0 {
            return Err(EmbedError::InvalidConfig(
                "max_length must be greater than zero".into(),
            ));
        }
        if self.mode == "stub" && self.stub_dim == 0 {
            return Err(EmbedError::InvalidConfig(
                "stub_dim must be greater than zero".into(),
            ));
        }
        if self.norm_tolerance.is_nan() || self.norm_tolerance <= 0.0 {
            return Err(EmbedError::InvalidConfig(
                "norm_tolerance must be positive".into(),
            ));
        }
        check_file_name("model_file", &self.model_file)?;
        check_file_name("tokenizer_file", &self.tokenizer_file)?;
        check_file_name("output_file", &self.output_file)?;

        let mut seen = HashSet::with_capacity(self.actions.len());
        for action in &self.actions {
            if action.id.trim().is_empty() {
                return Err(EmbedError::InvalidConfig("action id must not be empty".into()));
            }
            if !seen.insert(action.id.as_str()) {
                return Err(EmbedError::InvalidConfig(format!(
                    "duplicate action id `{}`",
                    action.id
                )));
            }
        }
        Ok(())
    }
}

fn check_file_name(field: &str, name: &str) -> Result<(), EmbedError> {
    let path = Path::new(name);
    if name.is_empty() || path.is_absolute() || path.components().count() != 1 {
        return Err(EmbedError::InvalidConfig(format!(
            "{field} must be a bare file name, got `{name}`"
        )));
    }
    Ok(())
}

/// The scene intents shipped with the Android app.
pub fn default_actions() -> Vec<ActionPrompt> {
    [
        (
            "TEXT",
            "a photo of a document, book, paper, text, receipt, sign, handwriting",
        ),
        (
            "SCENERY",
            "a photo of a landscape, mountain, sky, nature, sunset, park, beach",
        ),
        (
            "PERSON",
            "a photo of a person, face, man, woman, selfie, crowd, portrait",
        ),
        (
            "FOOD",
            "a photo of food, dish, meal, restaurant, fruit, vegetable, meat",
        ),
        (
            "OBJECT",
            "a photo of a product, bottle, box, item, tool, gadget, toy",
        ),
    ]
    .into_iter()
    .map(|(id, prompt)| ActionPrompt::new(id, prompt))
    .collect()
}
