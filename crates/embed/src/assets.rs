use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::info;
use ureq::AgentBuilder;

use crate::{EmbedConfig, EmbedError};

#[derive(Debug)]
pub(crate) struct ModelAssets {
    pub(crate) model_path: PathBuf,
    pub(crate) tokenizer_path: PathBuf,
    pub(crate) output_path: PathBuf,
}

/// Resolves every path under the asset directory and makes sure the tokenizer exists locally,
/// downloading it when a URL is configured. The encoder itself is checked when the session
/// is built.
pub(crate) fn resolve_model_assets(cfg: &EmbedConfig) -> Result<ModelAssets, EmbedError> {
    let tokenizer_path = ensure_local_file(
        &cfg.tokenizer_path(),
        cfg.tokenizer_url.as_deref(),
        Duration::from_secs(cfg.download_timeout_secs),
        || EmbedError::TokenizerMissing(cfg.tokenizer_path().display().to_string()),
    )?;

    Ok(ModelAssets {
        model_path: cfg.model_path(),
        tokenizer_path,
        output_path: cfg.output_path(),
    })
}

/// Returns `target` if it already exists, otherwise attempts to download `remote_url`.
fn ensure_local_file<F>(
    target: &Path,
    remote_url: Option<&str>,
    timeout: Duration,
    on_missing: F,
) -> Result<PathBuf, EmbedError>
where
    F: FnOnce() -> EmbedError,
{
    if target.exists() {
        return Ok(target.to_path_buf());
    }

    if let Some(url) = remote_url {
        download_to_path(target, url, timeout)?;
        return Ok(target.to_path_buf());
    }

    Err(on_missing())
}

/// Downloads `url` into `target`, creating parent directories as needed. A failed transfer
/// leaves no partial file behind.
fn download_to_path(target: &Path, url: &str, timeout: Duration) -> Result<(), EmbedError> {
    if let Some(parent) = target.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    info!(%url, target = %target.display(), "downloading tokenizer");
    let agent = AgentBuilder::new().timeout(timeout).build();
    let response = agent
        .get(url)
        .call()
        .map_err(|e| EmbedError::Download(e.to_string()))?;
    if !(200..300).contains(&response.status()) {
        return Err(EmbedError::Download(format!(
            "unexpected status {} while fetching {}",
            response.status(),
            url
        )));
    }

    let mut reader = response.into_reader();
    let mut file = File::create(target)?;
    if let Err(err) = io::copy(&mut reader, &mut file) {
        drop(file);
        let _ = fs::remove_file(target);
        return Err(EmbedError::Download(err.to_string()));
    }
    Ok(())
}
