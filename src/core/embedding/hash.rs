use crate::core::embedding::Embedder;
use crate::core::error::{DocragError, Result};
use crate::core::types::{EmbedderInfo, EmbeddingVector};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Feature-hashing embedder.
///
/// Each lowercase alphanumeric token is hashed with FNV-1a 64; the
/// low bits select a bucket and the top bit a sign. The bucket
/// vector is L2-normalized, so texts sharing vocabulary land close
/// under cosine similarity. Text without tokens embeds to the zero
/// vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
    max_tokens: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize, max_tokens: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            max_tokens,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384, 8192)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

impl Embedder for HashEmbedder {
    fn embed_one(&self, text: &str) -> Result<EmbeddingVector> {
        let mut vector = vec![0.0f32; self.dimension];
        let mut count = 0usize;

        for token in tokens(text) {
            count += 1;
            if count > self.max_tokens {
                return Err(DocragError::EmbeddingFailed(format!(
                    "Input exceeds {} tokens",
                    self.max_tokens
                )));
            }

            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        Ok(vector)
    }

    fn embed_many(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }

    fn info(&self) -> EmbedderInfo {
        EmbedderInfo {
            name: format!("fnv1a-{}", self.dimension),
            model: "feature-hash".to_string(),
            embedding_dimension: self.dimension,
        }
    }
}
