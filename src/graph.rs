//! Relationship graph - table adjacency derived from foreign keys
//!
//! Built purely from indexed entry metadata: the literal
//! `column -> table.column` strings are parsed back into structured edges.
//! The edge list keeps parallel edges (each foreign key is a distinct join
//! candidate); the adjacency view collapses them.

use std::collections::{BTreeMap, BTreeSet};

use crate::schema::ForeignKey;
use crate::store::IndexEntry;

/// One directed foreign-key edge between two tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FkEdge {
    /// Child table (holds the foreign-key column)
    pub from_table: String,
    /// Foreign-key column on the child table
    pub column: String,
    /// Parent table being referenced
    pub to_table: String,
    /// Referenced column on the parent table
    pub referenced_column: String,
}

/// Directed table-adjacency graph
#[derive(Debug, Default)]
pub struct RelationshipGraph {
    edges: Vec<FkEdge>,
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl RelationshipGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from indexed entries.
    ///
    /// Metadata strings that don't parse as `column -> table.column` are
    /// skipped; they can't contribute a join.
    pub fn from_entries(entries: &[IndexEntry]) -> Self {
        let mut graph = Self::new();
        for entry in entries {
            for arrow in &entry.metadata.foreign_keys {
                if let Some(fk) = ForeignKey::parse_arrow(arrow) {
                    graph.add_edge(FkEdge {
                        from_table: entry.metadata.table.clone(),
                        column: fk.column,
                        to_table: fk.referenced_table,
                        referenced_column: fk.referenced_column,
                    });
                }
            }
        }
        graph
    }

    /// Add an edge to the graph
    pub fn add_edge(&mut self, edge: FkEdge) {
        self.adjacency
            .entry(edge.from_table.clone())
            .or_default()
            .insert(edge.to_table.clone());
        self.edges.push(edge);
    }

    /// Mapping from table name to the set of tables it references
    pub fn adjacency(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.adjacency
    }

    /// Tables referenced by `table`, if any
    pub fn related(&self, table: &str) -> Option<&BTreeSet<String>> {
        self.adjacency.get(table)
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> &[FkEdge] {
        &self.edges
    }

    /// First foreign-key edge from `child` to `parent`, in insertion order
    fn edge_between(&self, child: &str, parent: &str) -> Option<&FkEdge> {
        self.edges
            .iter()
            .find(|e| e.from_table == child && e.to_table == parent)
    }

    /// Suggest a join predicate between two tables.
    ///
    /// Produced only when a direct foreign-key edge exists in either
    /// direction. The predicate is derived from the extracted foreign-key
    /// column names; it is a suggestion, not validated SQL.
    pub fn suggest_join(&self, table_a: &str, table_b: &str) -> Option<String> {
        let edge = self
            .edge_between(table_a, table_b)
            .or_else(|| self.edge_between(table_b, table_a))?;

        Some(format!(
            "{}.{} = {}.{}",
            edge.from_table, edge.column, edge.to_table, edge.referenced_column
        ))
    }

    /// Suggest JOIN clauses for every related unordered pair in `tables`,
    /// preserving input order.
    pub fn suggest_joins(&self, tables: &[String]) -> Vec<String> {
        let mut joins = Vec::new();
        for (i, table_a) in tables.iter().enumerate() {
            for table_b in &tables[i + 1..] {
                let edge = self
                    .edge_between(table_a, table_b)
                    .or_else(|| self.edge_between(table_b, table_a));
                if let Some(edge) = edge {
                    joins.push(format!(
                        "JOIN {} ON {}.{} = {}.{}",
                        edge.to_table,
                        edge.from_table,
                        edge.column,
                        edge.to_table,
                        edge.referenced_column
                    ));
                }
            }
        }
        joins
    }
}
