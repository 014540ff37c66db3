//! Structural schema types
//!
//! `TableSchema` is the ephemeral unit of extraction: it is recomputed in
//! full on every catalog pass and never persisted on its own. The persisted
//! form lives in [`crate::store`] as an indexed entry.

use serde::{Deserialize, Serialize};

/// A single column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type as reported by the catalog (e.g. `INTEGER`, `TEXT`)
    pub col_type: String,
    /// Whether NULL values are allowed
    pub nullable: bool,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
}

impl Column {
    /// Render as `name (TYPE)` for descriptions and prompts
    pub fn typed_name(&self) -> String {
        format!("{} ({})", self.name, self.col_type)
    }
}

/// A foreign-key relationship from one column to another table's column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Local column holding the reference
    pub column: String,
    /// Table the reference points at
    pub referenced_table: String,
    /// Column in the referenced table
    pub referenced_column: String,
}

impl ForeignKey {
    /// Render in the literal arrow form used throughout descriptions and
    /// indexed metadata: `column -> table.column`
    pub fn as_arrow(&self) -> String {
        format!(
            "{} -> {}.{}",
            self.column, self.referenced_table, self.referenced_column
        )
    }

    /// Parse the arrow form back into a structured foreign key.
    ///
    /// Returns `None` for strings that don't follow the
    /// `column -> table.column` shape.
    pub fn parse_arrow(s: &str) -> Option<Self> {
        let (column, target) = s.split_once(" -> ")?;
        let (table, referenced_column) = target.split_once('.')?;
        if column.is_empty() || table.is_empty() || referenced_column.is_empty() {
            return None;
        }
        Some(Self {
            column: column.trim().to_string(),
            referenced_table: table.trim().to_string(),
            referenced_column: referenced_column.trim().to_string(),
        })
    }
}

impl std::fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_arrow())
    }
}

/// Structural facts about one table, as of one extraction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name - the stable identifier across refreshes
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    /// Foreign keys in catalog order
    pub foreign_keys: Vec<ForeignKey>,
    /// Current row count
    pub row_count: u64,
}

impl TableSchema {
    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Columns rendered as `name (TYPE)`, in declaration order
    pub fn typed_columns(&self) -> Vec<String> {
        self.columns.iter().map(Column::typed_name).collect()
    }

    /// Names of the primary-key columns, in declaration order
    pub fn primary_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Foreign keys rendered in the arrow form, in catalog order
    pub fn foreign_key_arrows(&self) -> Vec<String> {
        self.foreign_keys.iter().map(ForeignKey::as_arrow).collect()
    }
}
