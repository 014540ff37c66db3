//! Table description synthesis
//!
//! Turns one table's structural facts into the natural-language text that
//! gets embedded, plus a set of domain-context tags. Pure and deterministic:
//! the same `TableSchema` always produces the same description, which is what
//! makes repeated synchronization passes reproducible.

use crate::schema::TableSchema;

/// One lexicon rule: keywords matched against table/column names.
///
/// Matching is case-insensitive substring containment. An empty keyword list
/// means the rule does not look at that side.
struct LexiconRule {
    tag: &'static str,
    sentence: &'static str,
    table_keywords: &'static [&'static str],
    column_keywords: &'static [&'static str],
}

/// Contextual tag lexicon. Declaration order is output order.
const LEXICON: &[LexiconRule] = &[
    LexiconRule {
        tag: "students",
        sentence: "Contains student information",
        table_keywords: &["student"],
        column_keywords: &["student"],
    },
    LexiconRule {
        tag: "academic",
        sentence: "Contains course/academic information",
        table_keywords: &["course"],
        column_keywords: &["course"],
    },
    LexiconRule {
        tag: "employers",
        sentence: "Contains company/employer information",
        table_keywords: &["company"],
        column_keywords: &["company", "employer"],
    },
    LexiconRule {
        tag: "enrollment",
        sentence: "Tracks student-course relationships and academic records",
        table_keywords: &["enrollment", "registration"],
        column_keywords: &[],
    },
    LexiconRule {
        tag: "academic-performance",
        sentence: "Includes academic performance data",
        table_keywords: &[],
        column_keywords: &["grade", "mark", "score"],
    },
    LexiconRule {
        tag: "geography",
        sentence: "Includes location/geographical information",
        table_keywords: &[],
        column_keywords: &["location", "address", "city", "state"],
    },
];

/// A synthesized table description with its matched context tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    /// The full natural-language description (the text that gets embedded)
    pub text: String,
    /// Matched context tags, in lexicon order
    pub tags: Vec<&'static str>,
}

/// Synthesize the description and tags for one table.
pub fn synthesize(schema: &TableSchema) -> TableDescription {
    let mut text = format!(
        "Table {} contains {} records",
        schema.name.to_uppercase(),
        schema.row_count
    );

    text.push_str(&format!(
        " with columns: {}",
        schema.typed_columns().join(", ")
    ));

    let primary_keys = schema.primary_keys();
    if !primary_keys.is_empty() {
        text.push_str(&format!(". Primary key: {}", primary_keys.join(", ")));
    }

    let foreign_keys = schema.foreign_key_arrows();
    if !foreign_keys.is_empty() {
        text.push_str(&format!(
            ". Foreign key relationships: {}",
            foreign_keys.join(", ")
        ));
    }

    let (tags, sentences) = match_lexicon(schema);
    if !sentences.is_empty() {
        text.push_str(". ");
        text.push_str(&sentences.join(". "));
    }

    TableDescription { text, tags }
}

/// Match the context lexicon against a table's name and column names.
fn match_lexicon(schema: &TableSchema) -> (Vec<&'static str>, Vec<&'static str>) {
    let table_lower = schema.name.to_lowercase();
    let columns_lower: Vec<String> = schema
        .columns
        .iter()
        .map(|c| c.name.to_lowercase())
        .collect();

    let mut tags = Vec::new();
    let mut sentences = Vec::new();

    for rule in LEXICON {
        let table_hit = rule.table_keywords.iter().any(|kw| table_lower.contains(kw));
        let column_hit = rule
            .column_keywords
            .iter()
            .any(|kw| columns_lower.iter().any(|col| col.contains(kw)));

        if table_hit || column_hit {
            tags.push(rule.tag);
            sentences.push(rule.sentence);
        }
    }

    (tags, sentences)
}
