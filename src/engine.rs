//! Engine facade
//!
//! `SchemaEngine` wires the catalog extractor, the embedder, and the vector
//! index into the surface a SQL-generation layer consumes. It is explicitly
//! constructed and passed by reference; its lifecycle (construction, first
//! synchronize, teardown) belongs to the caller.

use std::path::Path;

use serde::Serialize;

use crate::catalog::CatalogExtractor;
use crate::graph::RelationshipGraph;
use crate::query::embedding::{Embedder, EmbeddingEngine};
use crate::query::intent::{self, IntentReport};
use crate::query::retriever::{Retriever, SearchOutcome};
use crate::store::SqliteIndex;
use crate::sync::{SyncReport, Synchronizer};
use crate::Result;

/// Aggregate statistics over the indexed schema
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummary {
    pub total_tables: usize,
    pub total_columns: usize,
    pub total_records: u64,
    pub tables_with_relationships: usize,
    pub tables: Vec<String>,
}

impl SchemaSummary {
    /// Aggregate a summary from indexed entries
    pub fn from_entries(entries: &[crate::store::IndexEntry]) -> Self {
        Self {
            total_tables: entries.len(),
            total_columns: entries.iter().map(|e| e.metadata.columns.len()).sum(),
            total_records: entries.iter().map(|e| e.metadata.row_count).sum(),
            tables_with_relationships: entries
                .iter()
                .filter(|e| !e.metadata.foreign_keys.is_empty())
                .count(),
            tables: entries.iter().map(|e| e.id.clone()).collect(),
        }
    }
}

impl std::fmt::Display for SchemaSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Schema Summary:")?;
        writeln!(f, "  Tables: {}", self.total_tables)?;
        writeln!(f, "  Columns: {}", self.total_columns)?;
        writeln!(f, "  Records: {}", self.total_records)?;
        write!(
            f,
            "  Tables with relationships: {}",
            self.tables_with_relationships
        )
    }
}

/// Schema retrieval engine over one database and one index
pub struct SchemaEngine<E: Embedder = EmbeddingEngine> {
    extractor: CatalogExtractor,
    embedder: E,
    index: SqliteIndex,
}

impl SchemaEngine<EmbeddingEngine> {
    /// Open an engine with the default local embedding model.
    ///
    /// Loads the model eagerly; the first call may download weights.
    pub fn open(database: &Path, index_path: &Path) -> Result<Self> {
        let embedder = EmbeddingEngine::new()?;
        Self::with_embedder(database, index_path, embedder)
    }
}

impl<E: Embedder> SchemaEngine<E> {
    /// Open an engine with a caller-supplied embedder.
    ///
    /// The same embedder instance serves indexing and querying, keeping the
    /// two embedding spaces aligned.
    pub fn with_embedder(database: &Path, index_path: &Path, embedder: E) -> Result<Self> {
        Ok(Self {
            extractor: CatalogExtractor::new(database),
            embedder,
            index: SqliteIndex::open(index_path)?,
        })
    }

    /// Assemble an engine from already-constructed parts
    pub fn from_parts(extractor: CatalogExtractor, embedder: E, index: SqliteIndex) -> Self {
        Self {
            extractor,
            embedder,
            index,
        }
    }

    /// The underlying vector index (read-only uses: stats, graph dumps)
    pub fn index(&self) -> &SqliteIndex {
        &self.index
    }

    /// Run one synchronization pass (see [`crate::sync`])
    pub fn synchronize(&self) -> Result<SyncReport> {
        Synchronizer::new(&self.extractor, &self.embedder, &self.index).synchronize()
    }

    /// Find the top-k tables relevant to a question
    pub fn search(&self, question: &str, k: usize) -> SearchOutcome {
        Retriever::new(&self.embedder, &self.index).search(question, k)
    }

    /// Classify the intent of a question
    pub fn classify(&self, question: &str) -> IntentReport {
        intent::classify(question)
    }

    /// Build the relationship graph from the current index contents
    pub fn relationship_graph(&self) -> Result<RelationshipGraph> {
        Ok(RelationshipGraph::from_entries(&self.index.get_all()?))
    }

    /// Suggest a join predicate between two tables, if directly related
    pub fn suggest_join(&self, table_a: &str, table_b: &str) -> Result<Option<String>> {
        Ok(self.relationship_graph()?.suggest_join(table_a, table_b))
    }

    /// Suggest JOIN clauses for every related pair in a table set
    pub fn suggest_joins(&self, tables: &[String]) -> Result<Vec<String>> {
        Ok(self.relationship_graph()?.suggest_joins(tables))
    }

    /// Summarize the indexed schema
    pub fn summary(&self) -> Result<SchemaSummary> {
        Ok(SchemaSummary::from_entries(&self.index.get_all()?))
    }
}
