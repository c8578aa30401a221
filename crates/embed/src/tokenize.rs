use std::path::Path;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use crate::types::EncodedPrompt;
use crate::EmbedError;

/// Tokenizer pinned to a fixed sequence length: longer prompts are truncated, shorter ones
/// padded with the configured pad token, so every encoding has exactly `max_length` ids.
pub struct PromptTokenizer {
    inner: Tokenizer,
    max_length: usize,
}

impl PromptTokenizer {
    pub fn from_file(path: &Path, max_length: usize, pad_token: &str) -> Result<Self, EmbedError> {
        if !path.is_file() {
            return Err(EmbedError::TokenizerMissing(path.display().to_string()));
        }
        let tokenizer =
            Tokenizer::from_file(path).map_err(|e| EmbedError::Inference(e.to_string()))?;
        Self::from_tokenizer(tokenizer, max_length, pad_token)
    }

    pub fn from_tokenizer(
        mut tokenizer: Tokenizer,
        max_length: usize,
        pad_token: &str,
    ) -> Result<Self, EmbedError> {
        if max_length == 0 {
            return Err(EmbedError::InvalidConfig(
                "max_length must be greater than zero".into(),
            ));
        }
        let pad_id = tokenizer.token_to_id(pad_token).ok_or_else(|| {
            EmbedError::InvalidConfig(format!(
                "pad token `{pad_token}` is not in the tokenizer vocabulary"
            ))
        })?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| EmbedError::Inference(e.to_string()))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(max_length),
            pad_id,
            pad_token: pad_token.to_string(),
            ..Default::default()
        }));

        Ok(Self {
            inner: tokenizer,
            max_length,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn encode(&self, text: &str) -> Result<EncodedPrompt, EmbedError> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| EmbedError::Inference(e.to_string()))?;
        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| i64::from(id)).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| i64::from(m))
            .collect();

        if ids.len() != self.max_length || attention_mask.len() != ids.len() {
            return Err(EmbedError::Inference(format!(
                "tokenizer produced {} ids / {} mask entries, expected {}",
                ids.len(),
                attention_mask.len(),
                self.max_length
            )));
        }

        Ok(EncodedPrompt {
            ids,
            attention_mask,
        })
    }
}
