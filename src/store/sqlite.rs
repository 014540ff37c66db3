//! SQLite vector index implementation

use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use super::schema;
use crate::Result;
use crate::schema::TableSchema;

/// Serializable metadata stored alongside each entry.
///
/// List fields are native ordered sequences; foreign keys keep the literal
/// `column -> table.column` text as the element form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub table: String,
    pub columns: Vec<String>,
    pub column_types: Vec<String>,
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<String>,
    pub row_count: u64,
}

impl EntryMetadata {
    /// Build the persisted metadata view of one extracted table
    pub fn from_schema(schema: &TableSchema) -> Self {
        Self {
            table: schema.name.clone(),
            columns: schema.column_names(),
            column_types: schema.typed_columns(),
            primary_keys: schema.primary_keys(),
            foreign_keys: schema.foreign_key_arrows(),
            row_count: schema.row_count,
        }
    }
}

/// One persisted index entry. `id` is the table name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub description: String,
    pub embedding: Vec<f32>,
    pub metadata: EntryMetadata,
}

/// SQLite-backed vector index for schema entries
pub struct SqliteIndex {
    conn: Connection,
}

impl SqliteIndex {
    /// Open an index file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let index = Self { conn };
        index.initialize_schema()?;
        Ok(index)
    }

    /// Open an in-memory index (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let index = Self { conn };
        index.initialize_schema()?;
        Ok(index)
    }

    /// Initialize the index schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Insert or replace an entry by id (idempotent)
    pub fn upsert(&self, entry: &IndexEntry) -> Result<()> {
        let metadata = serde_json::to_string(&entry.metadata)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let blob = Self::vector_to_blob(&entry.embedding);

        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO schema_entries (id, description, vector, metadata)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![entry.id, entry.description, blob, metadata],
        )?;
        Ok(())
    }

    /// Delete entries by id; absent ids are a no-op. Returns rows removed.
    pub fn delete(&self, ids: &[String]) -> Result<usize> {
        let mut removed = 0;
        for id in ids {
            removed += self
                .conn
                .execute("DELETE FROM schema_entries WHERE id = ?1", [id])?;
        }
        Ok(removed)
    }

    /// Get one entry by id
    pub fn get(&self, id: &str) -> Result<Option<IndexEntry>> {
        self.conn
            .query_row(
                "SELECT id, description, vector, metadata FROM schema_entries WHERE id = ?1",
                [id],
                |row| Self::row_to_entry(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get all entries, ordered by id
    pub fn get_all(&self) -> Result<Vec<IndexEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, vector, metadata FROM schema_entries ORDER BY id",
        )?;

        let entries = stmt
            .query_map([], |row| Self::row_to_entry(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(entries)
    }

    /// Currently indexed ids
    pub fn ids(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare("SELECT id FROM schema_entries")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(ids)
    }

    /// Count all entries
    pub fn count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM schema_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Nearest-neighbor query by cosine distance.
    ///
    /// Returns at most `min(k, total entries)` results, ascending by
    /// distance (nearest first). An empty index yields an empty vec.
    pub fn query(&self, query_vector: &[f32], k: usize) -> Result<Vec<(IndexEntry, f32)>> {
        let mut scored: Vec<(IndexEntry, f32)> = self
            .get_all()?
            .into_iter()
            .map(|entry| {
                let distance = Self::cosine_distance(query_vector, &entry.embedding);
                (entry, distance)
            })
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    /// Helper to convert a row to an IndexEntry
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<IndexEntry> {
        let blob: Vec<u8> = row.get(2)?;
        let metadata_str: String = row.get(3)?;

        let metadata: EntryMetadata = serde_json::from_str(&metadata_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(IndexEntry {
            id: row.get(0)?,
            description: row.get(1)?,
            embedding: Self::blob_to_vector(&blob),
            metadata,
        })
    }

    fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
        vector.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
        blob.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Cosine distance (`1 - cosine similarity`); 1.0 for degenerate vectors
    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 1.0;
        }
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            1.0
        } else {
            1.0 - dot_product / (norm_a * norm_b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(id: &str, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            description: format!("Table {} contains 0 records", id.to_uppercase()),
            embedding,
            metadata: EntryMetadata {
                table: id.to_string(),
                columns: vec!["id".to_string()],
                column_types: vec!["id (INTEGER)".to_string()],
                primary_keys: vec!["id".to_string()],
                foreign_keys: vec![],
                row_count: 0,
            },
        }
    }

    #[test]
    fn test_upsert_is_idempotent_and_replaces() {
        let index = SqliteIndex::open_in_memory().unwrap();

        index.upsert(&sample_entry("students", vec![1.0, 0.0])).unwrap();
        index.upsert(&sample_entry("students", vec![1.0, 0.0])).unwrap();
        assert_eq!(index.count().unwrap(), 1);

        let mut replacement = sample_entry("students", vec![0.0, 1.0]);
        replacement.description = "changed".to_string();
        index.upsert(&replacement).unwrap();

        assert_eq!(index.count().unwrap(), 1);
        let stored = index.get("students").unwrap().unwrap();
        assert_eq!(stored.description, "changed");
        assert_eq!(stored.embedding, vec![0.0, 1.0]);
    }

    #[test]
    fn test_delete_missing_ids_is_noop() {
        let index = SqliteIndex::open_in_memory().unwrap();
        index.upsert(&sample_entry("students", vec![1.0])).unwrap();

        let removed = index
            .delete(&["ghosts".to_string(), "students".to_string()])
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(index.count().unwrap(), 0);
    }

    #[test]
    fn test_query_empty_index_returns_empty() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let results = index.query(&[1.0, 0.0], 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_query_orders_by_ascending_distance_and_clamps_k() {
        let index = SqliteIndex::open_in_memory().unwrap();
        index.upsert(&sample_entry("far", vec![0.0, 1.0])).unwrap();
        index.upsert(&sample_entry("near", vec![1.0, 0.0])).unwrap();
        index.upsert(&sample_entry("mid", vec![0.7, 0.7])).unwrap();

        let results = index.query(&[1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 3);

        let ids: Vec<_> = results.iter().map(|(e, _)| e.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(results[0].1 <= results[1].1 && results[1].1 <= results[2].1);

        let top = index.query(&[1.0, 0.0], 2).unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_metadata_roundtrip() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let mut entry = sample_entry("enrollments", vec![0.5, 0.5]);
        entry.metadata.foreign_keys = vec!["student_id -> students.id".to_string()];
        index.upsert(&entry).unwrap();

        let all = index.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].metadata, entry.metadata);
    }
}
