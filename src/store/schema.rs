//! Index database schema definitions

/// SQL to create the schema_entries table
pub const CREATE_SCHEMA_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_entries (
    id TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    vector BLOB NOT NULL,
    metadata TEXT NOT NULL
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_SCHEMA_ENTRIES_TABLE]
}
