//! Configuration for both preparation tools.
//!
//! Every setting has a compiled-in default, so running the binaries with no
//! file and no environment reproduces the stock asset layout. Overrides come
//! from an optional `visionprep.{yaml,toml,json}` file in the package root
//! (never the working directory) and then from `VISIONPREP__*` environment
//! variables, in that order.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! log_level: "debug"
//!
//! embed:
//!   mode: "onnx"
//!   asset_dir: "app/src/main/assets/mobileclip_s0"
//!   model_file: "text_model_uint8.onnx"
//!   actions:
//!     - id: "TEXT"
//!       prompt: "a photo of a document, book, paper, text, receipt, sign, handwriting"
//!     - id: "FOOD"
//!       prompt: "a photo of food, dish, meal, restaurant, fruit, vegetable, meat"
//!
//! export:
//!   checkpoint_path: "models/yolov8n.pt"
//!   format: "ncnn"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use embed::EmbedConfig;
use export::ExportConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the optional config file (extension picked up automatically).
pub const CONFIG_FILE_STEM: &str = "visionprep";

/// Prefix of environment overrides, e.g. `VISIONPREP__EMBED__MODE=stub`.
pub const ENV_PREFIX: &str = "VISIONPREP";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for both tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrepConfig {
    /// Configuration format version
    pub version: String,

    /// Default `tracing` filter; `RUST_LOG` wins when set.
    pub log_level: String,

    /// `"pretty"` for humans, `"json"` for machine-readable logs.
    pub log_format: String,

    /// Embedding generator settings
    pub embed: EmbedConfig,

    /// Model exporter settings
    pub export: ExportConfig,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            version: "1.0".into(),
            log_level: "info".into(),
            log_format: "pretty".into(),
            embed: EmbedConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl PrepConfig {
    /// Loads the optional package-root config file plus environment overrides.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let file_stem = package_root().join(CONFIG_FILE_STEM);
        let builder = Config::builder()
            .add_source(File::with_name(&file_stem.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Loads an explicit config file; relative paths inside it still resolve against the
    /// package root.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let builder = Config::builder().add_source(File::from(path.as_ref()).required(true));
        Self::from_builder(builder)
    }

    /// Parses YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let builder = Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml));
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigLoadError> {
        let config: PrepConfig = builder.build()?.try_deserialize()?;
        let config = config.anchored(&package_root());
        config.validate()?;
        Ok(config)
    }

    /// Pins relative asset and checkpoint paths to `root`. A base set by the file or the
    /// environment is kept, but a relative one is taken from `root` as well.
    pub fn anchored(mut self, root: &Path) -> Self {
        for base in [&mut self.embed.base_dir, &mut self.export.base_dir] {
            *base = Some(match base.take() {
                Some(dir) => root.join(dir),
                None => root.to_path_buf(),
            });
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }

        match self.log_format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigLoadError::Validation(format!(
                    "log_format must be `pretty` or `json`, got `{other}`"
                )));
            }
        }

        self.embed
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("embed: {e}")))?;
        self.export
            .target_format()
            .map_err(|e| ConfigLoadError::Validation(format!("export: {e}")))?;
        Ok(())
    }
}

/// Fixed base location for config and relative asset paths.
pub fn package_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_layout() {
        let cfg = PrepConfig::default().anchored(&package_root());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(
            cfg.embed.model_path(),
            package_root().join("assets/mobileclip_s0/text_model_uint8.onnx")
        );
        assert_eq!(
            cfg.export.resolved_checkpoint_path(),
            package_root().join("models/yolov8n.pt")
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let cfg = PrepConfig::from_yaml("version: \"1.0\"").unwrap();
        assert_eq!(cfg.embed.actions.len(), 5);
        assert_eq!(cfg.embed.max_length, 77);
        assert_eq!(cfg.export.format, "ncnn");
        assert_eq!(cfg.embed.base_dir, Some(package_root()));
    }

    #[test]
    fn yaml_overrides_nested_fields() {
        let yaml = r#"
version: "1"
log_level: "debug"
embed:
  mode: "stub"
  stub_dim: 16
  actions:
    - id: "TEXT"
      prompt: "a photo of a document"
export:
  format: "onnx"
  half: true
"#;
        let cfg = PrepConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.embed.mode, "stub");
        assert_eq!(cfg.embed.stub_dim, 16);
        assert_eq!(cfg.embed.actions.len(), 1);
        assert_eq!(cfg.embed.actions[0].id, "TEXT");
        assert_eq!(cfg.export.format, "onnx");
        assert!(cfg.export.half);
    }

    #[test]
    fn explicit_base_dir_is_kept() {
        let yaml = "embed:\n  base_dir: \"/srv/android\"\n";
        let cfg = PrepConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.embed.base_dir, Some(PathBuf::from("/srv/android")));
        assert_eq!(cfg.export.base_dir, Some(package_root()));
    }

    #[test]
    fn relative_base_dir_is_anchored_at_package_root() {
        let cfg = PrepConfig::from_yaml("export:\n  base_dir: \"proj\"\n").unwrap();
        assert_eq!(cfg.export.base_dir, Some(package_root().join("proj")));
        assert_eq!(
            cfg.export.resolved_checkpoint_path(),
            package_root().join("proj/models/yolov8n.pt")
        );
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let err = PrepConfig::from_yaml("version: \"2.0\"").unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn duplicate_action_ids_fail_validation() {
        let yaml = r#"
embed:
  actions:
    - { id: "TEXT", prompt: "a" }
    - { id: "TEXT", prompt: "b" }
"#;
        let err = PrepConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate action id"));
    }

    #[test]
    fn unknown_export_format_fails_validation() {
        let err = PrepConfig::from_yaml("export:\n  format: \"coreml\"\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Validation(_)));
    }

    #[test]
    fn bad_log_format_fails_validation() {
        let err = PrepConfig::from_yaml("log_format: \"xml\"\n").unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visionprep.toml");
        std::fs::write(&path, "log_level = \"warn\"\n[embed]\nmode = \"stub\"\n").unwrap();

        let cfg = PrepConfig::from_file(&path).unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.embed.mode, "stub");
    }
}
