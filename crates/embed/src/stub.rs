use fxhash::hash64;

use crate::encoder::TextEncoder;
use crate::types::EncodedPrompt;
use crate::EmbedError;

/// Deterministic encoder used when mode is `"stub"` and by tests.
/// Generates sinusoid values derived from a hash of the token ids, so identical prompts
/// always map to identical vectors and no model file is needed.
#[derive(Debug, Clone)]
pub struct StubTextEncoder {
    dim: usize,
}

impl StubTextEncoder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl TextEncoder for StubTextEncoder {
    fn embed(&mut self, prompt: &EncodedPrompt) -> Result<Vec<f32>, EmbedError> {
        let bytes: Vec<u8> = prompt
            .ids
            .iter()
            .flat_map(|id| id.to_le_bytes())
            .collect();
        let h = hash64(&bytes);
        let v = (0..self.dim)
            .map(|idx| ((h >> (idx % 32)) as f32 * 0.0001 + idx as f32).sin())
            .collect();
        Ok(v)
    }
}
