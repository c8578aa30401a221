use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::normalize::{dot, l2_norm};
use crate::EmbedError;

/// One business intent: the id the Android app switches on and the prompt shown to the encoder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionPrompt {
    pub id: String,
    pub prompt: String,
}

impl ActionPrompt {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
        }
    }
}

/// Token ids and attention mask for one prompt, already padded to the fixed length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPrompt {
    pub ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

impl EncodedPrompt {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of non-padding positions.
    pub fn real_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m != 0).count()
    }
}

/// Ordered action id → unit vector table.
///
/// Serializes as a single JSON object `{ "<ID>": [f32, ...], ... }`, keeping insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionTable {
    entries: Vec<(String, Vec<f32>)>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or replaces `id`. A replaced entry keeps its original position.
    pub fn insert(&mut self, id: impl Into<String>, vector: Vec<f32>) -> Option<Vec<f32>> {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => Some(std::mem::replace(slot, vector)),
            None => {
                self.entries.push((id, vector));
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, v)| v.as_slice())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.entries.iter().map(|(id, v)| (id.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Width of the first vector, if any.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|(_, v)| v.len())
    }

    /// Checks that the table is non-empty, every vector has the same non-zero width and
    /// every norm is within `tolerance` of 1. Returns the shared width.
    pub fn validate(&self, tolerance: f32) -> Result<usize, EmbedError> {
        let expected = match self.dimension() {
            Some(0) | None => {
                return Err(EmbedError::InvalidConfig(
                    "action table has no usable vectors".into(),
                ))
            }
            Some(dim) => dim,
        };

        for (id, vector) in &self.entries {
            if vector.len() != expected {
                return Err(EmbedError::DimensionMismatch {
                    id: id.clone(),
                    expected,
                    actual: vector.len(),
                });
            }
            let norm = l2_norm(vector);
            // NaN fails this comparison too
            if !((norm - 1.0).abs() < tolerance) {
                return Err(EmbedError::NotNormalized {
                    id: id.clone(),
                    norm,
                });
            }
        }
        Ok(expected)
    }

    /// Highest-scoring action for `query` by dot product. Vectors in the table are unit
    /// length, so the score is the cosine similarity whenever `query` is normalized too.
    pub fn best_match(&self, query: &[f32]) -> Option<(&str, f32)> {
        let mut best: Option<(&str, f32)> = None;
        for (id, vector) in &self.entries {
            if vector.len() != query.len() {
                continue;
            }
            let score = dot(vector, query);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((id.as_str(), score));
            }
        }
        best
    }

    pub fn to_json_string(&self) -> Result<String, EmbedError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, EmbedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the whole table first, then writes it in one call.
    pub fn write_json(&self, path: &Path) -> Result<(), EmbedError> {
        let json = self.to_json_string()?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, EmbedError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Serialize for ActionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, vector) in &self.entries {
            map.serialize_entry(id, vector)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ActionTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = ActionTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of action ids to float arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = ActionTable::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, vector)) = access.next_entry::<String, Vec<f32>>()? {
                    table.insert(id, vector);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Summary of one generator run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationReport {
    pub model_name: String,
    pub model_path: PathBuf,
    pub output_path: PathBuf,
    /// Number of actions written.
    pub entries: usize,
    /// Shared vector width.
    pub dimension: usize,
}
