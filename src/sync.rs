//! Index synchronization
//!
//! One synchronization pass reconciles the vector index against the live
//! schema: stale entries (tables that no longer exist) are deleted, and
//! every live table is re-described, re-embedded, and upserted. Re-embedding
//! is unconditional; it trades extra compute for convergence after any
//! schema drift, including column or type changes that don't alter the
//! table-name set.
//!
//! Concurrent passes against the same index are not safe; callers serialize
//! them (single-writer discipline).

use std::collections::BTreeSet;

use crate::catalog::CatalogExtractor;
use crate::describe;
use crate::query::embedding::Embedder;
use crate::store::{EntryMetadata, IndexEntry, SqliteIndex};
use crate::Result;

/// One table that could not be indexed during a pass
#[derive(Debug, Clone, serde::Serialize)]
pub struct TableFailure {
    pub table: String,
    pub reason: String,
}

/// Best-effort outcome of one synchronization pass
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SyncReport {
    /// Tables embedded and upserted
    pub indexed: usize,
    /// Stale entries removed
    pub removed: usize,
    /// Tables skipped this pass (embedding or upsert failure)
    pub failures: Vec<TableFailure>,
}

impl SyncReport {
    /// Whether every live table made it into the index
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "indexed {} tables, removed {} stale entries, {} failures",
            self.indexed,
            self.removed,
            self.failures.len()
        )
    }
}

/// Reconciles the vector index against the live schema.
///
/// The synchronizer is the only writer to the index.
pub struct Synchronizer<'a, E: Embedder> {
    extractor: &'a CatalogExtractor,
    embedder: &'a E,
    index: &'a SqliteIndex,
}

impl<'a, E: Embedder> Synchronizer<'a, E> {
    /// Create a new synchronizer
    pub fn new(extractor: &'a CatalogExtractor, embedder: &'a E, index: &'a SqliteIndex) -> Self {
        Self {
            extractor,
            embedder,
            index,
        }
    }

    /// Run one synchronization pass.
    ///
    /// An unreachable metadata source propagates as an `Extraction` error
    /// with no index mutation; an empty (but reachable) schema is a
    /// successful zero-work pass. Per-table embedding failures are collected
    /// in the report and do not block the remaining tables.
    pub fn synchronize(&self) -> Result<SyncReport> {
        let schemas = self.extractor.extract()?;

        let mut report = SyncReport::default();

        if schemas.is_empty() {
            tracing::warn!("no tables found in schema, leaving index untouched");
            return Ok(report);
        }

        let current_tables: BTreeSet<String> = schemas.iter().map(|s| s.name.clone()).collect();
        let indexed_ids = self.index.ids()?;

        let stale: Vec<String> = indexed_ids
            .difference(&current_tables)
            .cloned()
            .collect();
        if !stale.is_empty() {
            // A failed delete is recorded but must not block the upserts.
            match self.index.delete(&stale) {
                Ok(removed) => {
                    tracing::info!("removed {} stale entries from index", removed);
                    report.removed = removed;
                }
                Err(e) => {
                    tracing::warn!("failed to remove stale entries: {}", e);
                    for table in stale {
                        report.failures.push(TableFailure {
                            table,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        for schema in &schemas {
            let description = describe::synthesize(schema);

            let embedding = match self.embedder.encode(&description.text) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("embedding failed for table {}: {}", schema.name, e);
                    report.failures.push(TableFailure {
                        table: schema.name.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let entry = IndexEntry {
                id: schema.name.clone(),
                description: description.text,
                embedding,
                metadata: EntryMetadata::from_schema(schema),
            };

            match self.index.upsert(&entry) {
                Ok(()) => report.indexed += 1,
                Err(e) => {
                    tracing::warn!("upsert failed for table {}: {}", schema.name, e);
                    report.failures.push(TableFailure {
                        table: schema.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("synchronization pass complete: {}", report);
        Ok(report)
    }
}
