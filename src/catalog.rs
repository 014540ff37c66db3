//! Schema catalog extraction
//!
//! Stateless reader of SQLite catalog metadata. Every call to
//! [`CatalogExtractor::extract`] produces a fresh snapshot of the live
//! schema; nothing is cached between calls and nothing is ever written back.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::schema::{Column, ForeignKey, TableSchema};
use crate::{Error, Result};

/// Reads table structure from a SQLite database.
pub struct CatalogExtractor {
    db_path: PathBuf,
}

impl CatalogExtractor {
    /// Create an extractor for the database at `db_path`
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Path of the database this extractor reads
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Extract the structure of every user table.
    ///
    /// Internal `sqlite_%` tables are excluded and the result is ordered by
    /// table name. A table whose metadata cannot be read is skipped with a
    /// warning; the remaining tables are still extracted. An unreachable
    /// database yields an [`Error::Extraction`].
    pub fn extract(&self) -> Result<Vec<TableSchema>> {
        // Read-only open: a missing database is an error, not a new file.
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            Error::Extraction(format!(
                "cannot open database {}: {}",
                self.db_path.display(),
                e
            ))
        })?;

        let table_names = self.list_tables(&conn)?;

        let mut schemas = Vec::with_capacity(table_names.len());
        for table in &table_names {
            match self.read_table(&conn, table) {
                Ok(Some(schema)) => schemas.push(schema),
                Ok(None) => {
                    tracing::debug!("table {} has no columns, skipping", table);
                }
                Err(e) => {
                    tracing::warn!("failed to read metadata for table {}: {}", table, e);
                }
            }
        }

        tracing::debug!("extracted {} table schemas", schemas.len());
        Ok(schemas)
    }

    /// List user tables, excluding SQLite internals, ordered by name
    fn list_tables(&self, conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
            )
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| Error::Extraction(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(names)
    }

    /// Read one table's structure; `None` if the catalog reports no columns
    fn read_table(&self, conn: &Connection, table: &str) -> Result<Option<TableSchema>> {
        let columns = self.read_columns(conn, table)?;
        if columns.is_empty() {
            return Ok(None);
        }

        let foreign_keys = self.read_foreign_keys(conn, table)?;
        let row_count = self.count_rows(conn, table)?;

        Ok(Some(TableSchema {
            name: table.to_string(),
            columns,
            foreign_keys,
            row_count,
        }))
    }

    fn read_columns(&self, conn: &Connection, table: &str) -> Result<Vec<Column>> {
        let mut stmt = conn
            .prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1)")
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let columns = stmt
            .query_map([table], |row| {
                let not_null: i64 = row.get(2)?;
                let pk: i64 = row.get(3)?;
                Ok(Column {
                    name: row.get(0)?,
                    col_type: row.get(1)?,
                    nullable: not_null == 0,
                    primary_key: pk > 0,
                })
            })
            .map_err(|e| Error::Extraction(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(columns)
    }

    fn read_foreign_keys(&self, conn: &Connection, table: &str) -> Result<Vec<ForeignKey>> {
        let mut stmt = conn
            .prepare("SELECT \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1)")
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let foreign_keys = stmt
            .query_map([table], |row| {
                // `to` is NULL when the FK targets the parent's primary key
                // implicitly; resolve to the conventional `id`.
                let referenced_column: Option<String> = row.get(2)?;
                Ok(ForeignKey {
                    referenced_table: row.get(0)?,
                    column: row.get(1)?,
                    referenced_column: referenced_column.unwrap_or_else(|| "id".to_string()),
                })
            })
            .map_err(|e| Error::Extraction(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(foreign_keys)
    }

    fn count_rows(&self, conn: &Connection, table: &str) -> Result<u64> {
        // Identifiers cannot be bound; quote and escape the table name.
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", table.replace('"', "\"\""));
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| Error::Extraction(e.to_string()))?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_db(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("college.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE departments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            );
            CREATE TABLE students (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                dept_id INTEGER,
                gpa REAL,
                FOREIGN KEY (dept_id) REFERENCES departments(id)
            );
            INSERT INTO departments (name) VALUES ('Physics'), ('History');
            INSERT INTO students VALUES (1, 'Ada', 1, 3.9);
            "#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_extract_tables_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = CatalogExtractor::new(fixture_db(&dir));

        let schemas = extractor.extract().unwrap();

        // sqlite_sequence (created by AUTOINCREMENT) must be excluded
        let names: Vec<_> = schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["departments", "students"]);
    }

    #[test]
    fn test_extract_columns_keys_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = CatalogExtractor::new(fixture_db(&dir));

        let schemas = extractor.extract().unwrap();
        let students = schemas.iter().find(|s| s.name == "students").unwrap();

        assert_eq!(
            students.column_names(),
            vec!["id", "name", "dept_id", "gpa"]
        );
        assert_eq!(students.primary_keys(), vec!["id"]);
        assert!(!students.columns[1].nullable);
        assert!(students.columns[3].nullable);
        assert_eq!(students.row_count, 1);
        assert_eq!(
            students.foreign_key_arrows(),
            vec!["dept_id -> departments.id"]
        );

        let departments = schemas.iter().find(|s| s.name == "departments").unwrap();
        assert_eq!(departments.row_count, 2);
        assert!(departments.foreign_keys.is_empty());
    }

    #[test]
    fn test_missing_database_is_extraction_error() {
        let extractor = CatalogExtractor::new("/nonexistent/no.db");
        let err = extractor.extract().unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_implicit_foreign_key_column_defaults_to_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("implicit.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE companies (id INTEGER PRIMARY KEY, name TEXT);
            CREATE TABLE offers (
                id INTEGER PRIMARY KEY,
                company_id INTEGER REFERENCES companies
            );
            "#,
        )
        .unwrap();
        drop(conn);

        let schemas = CatalogExtractor::new(&path).extract().unwrap();
        let offers = schemas.iter().find(|s| s.name == "offers").unwrap();
        assert_eq!(
            offers.foreign_key_arrows(),
            vec!["company_id -> companies.id"]
        );
    }
}
