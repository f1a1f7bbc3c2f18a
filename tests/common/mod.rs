//! Shared helpers for integration tests.

#![allow(dead_code)]

use paperdex::{EmbeddingGenerator, Record, TechniqueType, VectorDimension, VectorError};
use std::collections::HashMap;

/// Deterministic embedder: pinned vectors for chosen texts, a byte hash
/// spread over the dimensions for everything else.
pub struct FixedEmbedder {
    dimension: VectorDimension,
    model_name: String,
    fixed: HashMap<String, Vec<f32>>,
}

impl FixedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: VectorDimension::new(dimension).unwrap(),
            model_name: "fixed-test-embedder".to_string(),
            fixed: HashMap::new(),
        }
    }

    pub fn named(mut self, model_name: &str) -> Self {
        self.model_name = model_name.to_string();
        self
    }

    pub fn pin(mut self, text: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dimension.get());
        self.fixed.insert(text.to_string(), vector);
        self
    }

    fn hashed(&self, text: &str) -> Vec<f32> {
        let dim = self.dimension.get();
        let mut vector = vec![0.0f32; dim];
        let mut state: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in text.bytes() {
            state ^= u64::from(byte);
            state = state.wrapping_mul(0x0100_0000_01b3);
            vector[(state % dim as u64) as usize] += 1.0;
        }
        vector
    }
}

impl EmbeddingGenerator for FixedEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, VectorError> {
        Ok(texts
            .iter()
            .map(|text| {
                self.fixed
                    .get(*text)
                    .cloned()
                    .unwrap_or_else(|| self.hashed(text))
            })
            .collect())
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

pub fn paper(title: &str) -> Record {
    Record {
        title: title.to_string(),
        summary: format!("A paper about {title}."),
        year: "2024".to_string(),
        month: "June".to_string(),
        authors: vec!["First Author".to_string(), "Second Author".to_string()],
        technique_type: TechniqueType::PromptEngineeringTechnique,
        technique_description: format!("{title} technique"),
    }
}
