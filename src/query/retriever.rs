//! Relevance retrieval
//!
//! Embeds a free-text question and ranks indexed tables by similarity.
//! Degrades to an empty result set (with a status flag) when the index is
//! empty or the embedding call fails; retrieval never hard-faults.

use serde::{Deserialize, Serialize};

use crate::query::embedding::Embedder;
use crate::store::{EntryMetadata, SqliteIndex};

/// One relevant table with its normalized similarity score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceResult {
    pub description: String,
    pub metadata: EntryMetadata,
    /// `1 - cosine distance`, clamped to [0, 1]
    pub similarity: f32,
}

/// Outcome of one search: best-effort results plus a degraded-status flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Relevant tables, descending by similarity
    pub results: Vec<RelevanceResult>,
    /// Present when retrieval degraded (embedding or index failure)
    pub failure: Option<String>,
}

impl SearchOutcome {
    fn degraded(reason: String) -> Self {
        Self {
            results: Vec::new(),
            failure: Some(reason),
        }
    }

    /// Whether this outcome came from a degraded search
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

/// Retriever over a vector index and the embedder it was indexed with
pub struct Retriever<'a, E: Embedder> {
    embedder: &'a E,
    index: &'a SqliteIndex,
}

impl<'a, E: Embedder> Retriever<'a, E> {
    /// Create a new retriever
    pub fn new(embedder: &'a E, index: &'a SqliteIndex) -> Self {
        Self { embedder, index }
    }

    /// Find the top-k tables most relevant to `question`.
    ///
    /// Returns at most `min(k, indexed entries)` results, descending by
    /// similarity. An empty index yields an empty outcome; failures yield an
    /// empty outcome with the failure recorded, never an error.
    pub fn search(&self, question: &str, k: usize) -> SearchOutcome {
        let query_vector = match self.embedder.encode(question) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("question embedding failed: {}", e);
                return SearchOutcome::degraded(e.to_string());
            }
        };

        let scored = match self.index.query(&query_vector, k) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("index query failed: {}", e);
                return SearchOutcome::degraded(e.to_string());
            }
        };

        let results = scored
            .into_iter()
            .map(|(entry, distance)| RelevanceResult {
                description: entry.description,
                metadata: entry.metadata,
                similarity: (1.0 - distance).clamp(0.0, 1.0),
            })
            .collect();

        SearchOutcome {
            results,
            failure: None,
        }
    }
}

/// Render relevance results into the plain-text schema block a
/// SQL-generation prompt consumes.
pub fn grounding_context(results: &[RelevanceResult]) -> String {
    let mut blocks = Vec::with_capacity(results.len());

    for result in results {
        let meta = &result.metadata;
        let mut lines = vec![
            format!("TABLE: {}", meta.table),
            format!("Rows: {}", meta.row_count),
            format!("Columns: {}", meta.column_types.join(", ")),
        ];
        if !meta.primary_keys.is_empty() {
            lines.push(format!("Primary Keys: {}", meta.primary_keys.join(", ")));
        }
        if !meta.foreign_keys.is_empty() {
            lines.push(format!("Foreign Keys: {}", meta.foreign_keys.join(", ")));
        }
        lines.push(format!("Relevance: {:.2}", result.similarity));
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::embedding::stub::HashEmbedder;
    use crate::store::IndexEntry;

    fn indexed_entry(embedder: &HashEmbedder, table: &str, description: &str) -> IndexEntry {
        IndexEntry {
            id: table.to_string(),
            description: description.to_string(),
            embedding: embedder.encode(description).unwrap(),
            metadata: EntryMetadata {
                table: table.to_string(),
                columns: vec!["id".to_string()],
                column_types: vec!["id (INTEGER)".to_string()],
                primary_keys: vec!["id".to_string()],
                foreign_keys: vec![],
                row_count: 10,
            },
        }
    }

    fn populated_index(embedder: &HashEmbedder) -> SqliteIndex {
        let index = SqliteIndex::open_in_memory().unwrap();
        index
            .upsert(&indexed_entry(
                embedder,
                "students",
                "Table STUDENTS contains 10 records. Contains student information",
            ))
            .unwrap();
        index
            .upsert(&indexed_entry(
                embedder,
                "companies",
                "Table COMPANIES contains 10 records. Contains company/employer information",
            ))
            .unwrap();
        index
    }

    #[test]
    fn test_search_ranks_relevant_table_first() {
        let embedder = HashEmbedder::new();
        let index = populated_index(&embedder);
        let retriever = Retriever::new(&embedder, &index);

        let outcome = retriever.search("show student information", 2);

        assert!(!outcome.is_degraded());
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].metadata.table, "students");
        assert!(outcome.results[0].similarity >= outcome.results[1].similarity);
    }

    #[test]
    fn test_search_clamps_k_and_score_bounds() {
        let embedder = HashEmbedder::new();
        let index = populated_index(&embedder);
        let retriever = Retriever::new(&embedder, &index);

        let outcome = retriever.search("anything at all", 50);

        assert_eq!(outcome.results.len(), 2);
        for result in &outcome.results {
            assert!((0.0..=1.0).contains(&result.similarity));
        }
    }

    #[test]
    fn test_search_empty_index_is_safe() {
        let embedder = HashEmbedder::new();
        let index = SqliteIndex::open_in_memory().unwrap();
        let retriever = Retriever::new(&embedder, &index);

        let outcome = retriever.search("anything", 3);

        assert!(outcome.results.is_empty());
        assert!(!outcome.is_degraded());
    }

    #[test]
    fn test_embedding_failure_degrades_to_empty() {
        let embedder = HashEmbedder::failing_on("student");
        let index = SqliteIndex::open_in_memory().unwrap();
        let retriever = Retriever::new(&embedder, &index);

        let outcome = retriever.search("show students", 3);

        assert!(outcome.results.is_empty());
        assert!(outcome.is_degraded());
    }

    #[test]
    fn test_grounding_context_layout() {
        let results = vec![RelevanceResult {
            description: "ignored".to_string(),
            metadata: EntryMetadata {
                table: "students".to_string(),
                columns: vec!["id".to_string(), "name".to_string()],
                column_types: vec!["id (INTEGER)".to_string(), "name (TEXT)".to_string()],
                primary_keys: vec!["id".to_string()],
                foreign_keys: vec!["dept_id -> departments.id".to_string()],
                row_count: 120,
            },
            similarity: 0.87,
        }];

        let context = grounding_context(&results);

        assert_eq!(
            context,
            "TABLE: students\n\
             Rows: 120\n\
             Columns: id (INTEGER), name (TEXT)\n\
             Primary Keys: id\n\
             Foreign Keys: dept_id -> departments.id\n\
             Relevance: 0.87"
        );
    }
}
