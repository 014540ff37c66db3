use tabled::{Table, Tabled, settings::Style};

use crate::query::retriever::RelevanceResult;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Similarity")]
    similarity: String,
    #[tabled(rename = "Rows")]
    rows: u64,
    #[tabled(rename = "Columns")]
    columns: usize,
}

/// Render relevance results as a terminal table
pub fn results_table(results: &[RelevanceResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let rows: Vec<ResultRow> = results
        .iter()
        .map(|r| ResultRow {
            table: r.metadata.table.clone(),
            similarity: format!("{:.2}", r.similarity),
            rows: r.metadata.row_count,
            columns: r.metadata.columns.len(),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}
