use crate::types::EncodedPrompt;
use crate::EmbedError;

/// One forward pass of a text encoder: a padded prompt in, one raw (unnormalized) vector out.
pub trait TextEncoder {
    fn embed(&mut self, prompt: &EncodedPrompt) -> Result<Vec<f32>, EmbedError>;
}

impl<E: TextEncoder + ?Sized> TextEncoder for Box<E> {
    fn embed(&mut self, prompt: &EncodedPrompt) -> Result<Vec<f32>, EmbedError> {
        (**self).embed(prompt)
    }
}
