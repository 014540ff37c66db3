//! Query layer: embeddings, relevance retrieval, intent classification

pub mod embedding;
pub mod intent;
pub mod retriever;

pub use embedding::{Embedder, EmbeddingEngine};
pub use intent::{IntentReport, QueryType, classify};
pub use retriever::{RelevanceResult, Retriever, SearchOutcome, grounding_context};
