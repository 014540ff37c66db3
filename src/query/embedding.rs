use crate::Result;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

/// Text-to-vector seam between the engine and the embedding model.
///
/// Indexing and querying must go through the same `Embedder` instance so the
/// two embedding spaces match.
pub trait Embedder {
    /// Embed a single text
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving order
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Engine for generating text embeddings using a local transformer model
pub struct EmbeddingEngine {
    model: TextEmbedding,
}

impl EmbeddingEngine {
    /// Create a new embedding engine with the default model
    pub fn new() -> Result<Self> {
        let mut options = InitOptions::default();
        options.model_name = EmbeddingModel::AllMiniLML6V2;
        options.show_download_progress = true;

        let model = TextEmbedding::try_new(options)
            .map_err(|e| crate::Error::Embedding(format!("Failed to load embedding model: {}", e)))?;

        Ok(Self { model })
    }
}

impl Embedder for EmbeddingEngine {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self
            .model
            .embed(vec![text.to_string()], None)
            .map_err(|e| crate::Error::Embedding(format!("Embedding generation failed: {}", e)))?;

        Ok(embeddings.remove(0))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        self.model
            .embed(texts.to_vec(), None)
            .map_err(|e| crate::Error::Embedding(format!("Embedding generation failed: {}", e)))
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Deterministic bag-of-words embedder for tests. Shared token counts
    //! between two texts produce higher cosine similarity, which is all the
    //! retrieval tests need.

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::Embedder;
    use crate::{Error, Result};

    const DIM: usize = 512;

    pub struct HashEmbedder {
        fail_on: Option<String>,
    }

    impl HashEmbedder {
        pub fn new() -> Self {
            Self { fail_on: None }
        }

        /// An embedder that errors for any text containing `needle`
        pub fn failing_on(needle: &str) -> Self {
            Self {
                fail_on: Some(needle.to_string()),
            }
        }
    }

    impl Embedder for HashEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            if let Some(needle) = &self.fail_on {
                if text.to_lowercase().contains(&needle.to_lowercase()) {
                    return Err(Error::Embedding(format!("stub failure on '{}'", needle)));
                }
            }

            let mut vector = vec![0.0f32; DIM];
            for token in text
                .to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .filter(|t| !t.is_empty())
            {
                let mut hasher = DefaultHasher::new();
                token.hash(&mut hasher);
                vector[(hasher.finish() % DIM as u64) as usize] += 1.0;
            }
            Ok(vector)
        }

        fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            texts.iter().map(|t| self.encode(t)).collect()
        }
    }
}
