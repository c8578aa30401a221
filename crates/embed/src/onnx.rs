use ort::session::{Session, SessionInputValue};
use ort::value::Tensor;
use std::path::Path;
use tracing::debug;

use crate::encoder::TextEncoder;
use crate::types::EncodedPrompt;
use crate::EmbedError;

/// CLIP text encoder exported to ONNX, driven through ONNX Runtime.
pub struct OnnxTextEncoder {
    session: Session,
    input_names: Vec<String>,
}

impl OnnxTextEncoder {
    /// Builds a single-threaded session bound to `model_path`.
    pub fn load(model_path: &Path) -> Result<Self, EmbedError> {
        if !model_path.is_file() {
            return Err(EmbedError::ModelNotFound(model_path.display().to_string()));
        }

        let session = Session::builder()
            .map_err(|e| EmbedError::Inference(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e| EmbedError::Inference(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| EmbedError::Inference(e.to_string()))?;

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        if input_names.is_empty() {
            return Err(EmbedError::Inference(
                "model did not declare any inputs".into(),
            ));
        }
        debug!(model = %model_path.display(), inputs = ?input_names, "loaded text encoder");

        Ok(Self {
            session,
            input_names,
        })
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }
}

impl TextEncoder for OnnxTextEncoder {
    fn embed(&mut self, prompt: &EncodedPrompt) -> Result<Vec<f32>, EmbedError> {
        let shape = vec![1_i64, prompt.len() as i64];
        let mut inputs: Vec<(String, SessionInputValue<'static>)> =
            Vec::with_capacity(self.input_names.len());

        for (name, data) in bind_inputs(&self.input_names, prompt)? {
            let tensor = Tensor::from_array((shape.clone(), data))
                .map_err(|e| EmbedError::Inference(e.to_string()))?;
            inputs.push((name, tensor.into()));
        }

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| EmbedError::Inference(e.to_string()))?;
        let (out_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| EmbedError::Inference(e.to_string()))?;

        first_row(out_shape, data)
    }
}

/// Pairs each declared model input with its data, in declaration order.
fn bind_inputs(
    input_names: &[String],
    prompt: &EncodedPrompt,
) -> Result<Vec<(String, Vec<i64>)>, EmbedError> {
    if !input_names.iter().any(|n| n == "input_ids") {
        return Err(EmbedError::Inference(format!(
            "model inputs {input_names:?} do not include 'input_ids'"
        )));
    }
    input_names
        .iter()
        .map(|name| {
            let data = match name.as_str() {
                "input_ids" => prompt.ids.clone(),
                "attention_mask" => prompt.attention_mask.clone(),
                other => {
                    return Err(EmbedError::Inference(format!(
                        "unsupported model input '{other}'"
                    )))
                }
            };
            Ok((name.clone(), data))
        })
        .collect()
}

/// Takes the vector for the single batch element out of the first output tensor.
/// Accepts `[batch, width]` (pooled text embeddings) or a bare `[width]`.
fn first_row(shape: &[i64], data: &[f32]) -> Result<Vec<f32>, EmbedError> {
    let width = match shape {
        [width] => *width,
        [batch, width] if *batch >= 1 => *width,
        other => {
            return Err(EmbedError::Inference(format!(
                "unexpected output shape {other:?}; expected [batch, width]"
            )))
        }
    };
    let width = usize::try_from(width)
        .map_err(|_| EmbedError::Inference(format!("negative output width {width}")))?;
    if width == 0 || data.len() < width {
        return Err(EmbedError::Inference(format!(
            "output holds {} values, cannot take a row of {width}",
            data.len()
        )));
    }
    Ok(data[..width].to_vec())
}
