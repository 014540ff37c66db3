//! # Schemascout - Schema-aware semantic retrieval engine
//!
//! Schemascout grounds natural-language-to-SQL pipelines: it reads the live
//! schema of a relational database, turns every table into a natural-language
//! description with a vector embedding, and keeps a persistent vector index
//! synchronized with the schema so a question can be matched to the handful
//! of tables it is actually about.
//!
//! Schemascout provides:
//! - Catalog extraction (tables, columns, keys, row counts) from SQLite
//! - Deterministic table descriptions with domain-context tags
//! - A SQLite-backed vector index with nearest-neighbor query
//! - Reconcile-and-reindex synchronization against schema drift
//! - Relevance search, join suggestions, and query-intent classification
//!
//! It never executes SQL and never writes back to the relational store.

pub mod catalog;
pub mod config;
pub mod describe;
pub mod engine;
pub mod graph;
pub mod query;
pub mod schema;
pub mod store;
pub mod sync;
pub mod ui;

// Re-exports for convenient access
pub use catalog::CatalogExtractor;
pub use engine::{SchemaEngine, SchemaSummary};
pub use graph::RelationshipGraph;
pub use query::intent::{IntentReport, QueryType};
pub use query::retriever::{RelevanceResult, SearchOutcome};
pub use schema::{Column, ForeignKey, TableSchema};
pub use store::SqliteIndex;
pub use sync::{SyncReport, Synchronizer};

/// Result type alias for Schemascout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Schemascout operations
///
/// All variants are recoverable at the operation level: callers get a
/// best-effort result plus a failure indicator, never an unhandled fault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
