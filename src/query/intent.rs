//! Query intent classification
//!
//! Buckets a natural-language question into a query-type category and
//! decides whether a downstream narrative summary is warranted. Pure lexicon
//! scoring, no model calls.

use serde::{Deserialize, Serialize};

/// Categories a question can fall into.
///
/// Every category except `SimpleLookup` implies a narrative summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Plain retrieval: show, list, filter, sort
    SimpleLookup,
    /// Analysis, insights, trends, correlations
    ComplexAnalysis,
    /// Explicit questions about how tables/entities relate
    Relationship,
    /// Aggregation-heavy questions (group by, averages over groups)
    TrendAnalysis,
    /// A-versus-B style questions
    Comparison,
}

impl QueryType {
    /// Get the string representation of the query type
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::SimpleLookup => "simple_lookup",
            QueryType::ComplexAnalysis => "complex_analysis",
            QueryType::Relationship => "relationship",
            QueryType::TrendAnalysis => "trend_analysis",
            QueryType::Comparison => "comparison",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keywords indicating analytical questions
const ANALYTICAL_KEYWORDS: &[&str] = &[
    "analyze",
    "analysis",
    "correlation",
    "trend",
    "pattern",
    "insight",
    "impact",
    "effect",
    "influence",
    "compare",
    "comparison",
    "performance",
    "over time",
    "yearly",
    "monthly",
    "growth",
    "decline",
];

/// Keywords indicating simple retrieval
const SIMPLE_KEYWORDS: &[&str] = &[
    "show", "list", "display", "get", "find", "top", "bottom", "count", "sum", "total", "average",
    "max", "min",
];

/// Keywords indicating aggregation
const AGGREGATION_KEYWORDS: &[&str] = &[
    "group by",
    "order by",
    "sum",
    "count",
    "average",
    "max",
    "min",
    "total",
    "aggregate",
];

/// Result of classifying one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentReport {
    pub query_type: QueryType,
    pub needs_summary: bool,
    /// `max(score) / 10`, clamped to [0, 1]
    pub confidence: f32,
    pub analytical_score: usize,
    pub simple_score: usize,
    pub aggregation_score: usize,
}

/// Classify a question by lexicon scoring.
///
/// Precedence is fixed: analytical match wins, then an explicit
/// "relationship"/"relation" mention, then aggregation-dominant questions,
/// then "compare"/"versus", else simple lookup.
pub fn classify(question: &str) -> IntentReport {
    let query_lower = question.to_lowercase();

    let score = |keywords: &[&str]| {
        keywords
            .iter()
            .filter(|kw| query_lower.contains(*kw))
            .count()
    };

    let analytical_score = score(ANALYTICAL_KEYWORDS);
    let simple_score = score(SIMPLE_KEYWORDS);
    let aggregation_score = score(AGGREGATION_KEYWORDS);

    let query_type = if analytical_score > 0 {
        QueryType::ComplexAnalysis
    } else if query_lower.contains("relationship") || query_lower.contains("relation") {
        QueryType::Relationship
    } else if aggregation_score > simple_score && aggregation_score > 1 {
        QueryType::TrendAnalysis
    } else if query_lower.contains("compare") || query_lower.contains("versus") {
        QueryType::Comparison
    } else {
        QueryType::SimpleLookup
    };

    let max_score = analytical_score.max(simple_score).max(aggregation_score);

    IntentReport {
        query_type,
        needs_summary: query_type != QueryType::SimpleLookup,
        confidence: (max_score as f32 / 10.0).clamp(0.0, 1.0),
        analytical_score,
        simple_score,
        aggregation_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_lookup() {
        let report = classify("Show all students");

        assert_eq!(report.query_type, QueryType::SimpleLookup);
        assert!(!report.needs_summary);
        assert!(report.confidence > 0.0);
    }

    #[test]
    fn test_complex_analysis() {
        let report = classify("Analyze the trend of enrollment growth across departments");

        assert_eq!(report.query_type, QueryType::ComplexAnalysis);
        assert!(report.needs_summary);
        assert!(report.analytical_score >= 3); // analyze, trend, growth
    }

    #[test]
    fn test_relationship() {
        let report = classify("What is the relationship between GPA and salary offers?");

        assert_eq!(report.query_type, QueryType::Relationship);
        assert!(report.needs_summary);
    }

    #[test]
    fn test_trend_analysis_when_aggregation_dominates() {
        let report = classify("Average salary per department, group by department");

        assert_eq!(report.aggregation_score, 2); // average, group by
        assert_eq!(report.simple_score, 1); // average
        assert_eq!(report.query_type, QueryType::TrendAnalysis);
        assert!(report.needs_summary);
    }

    #[test]
    fn test_comparison_via_versus() {
        let report = classify("Engineering versus Science enrollment this semester");

        assert_eq!(report.query_type, QueryType::Comparison);
        assert!(report.needs_summary);
    }

    #[test]
    fn test_compare_is_analytical() {
        // "compare" sits in the analytical lexicon, so it outranks the
        // comparison branch.
        let report = classify("Compare the average salaries offered by different companies");
        assert_eq!(report.query_type, QueryType::ComplexAnalysis);
    }

    #[test]
    fn test_confidence_bounds() {
        let empty = classify("");
        assert_eq!(empty.query_type, QueryType::SimpleLookup);
        assert_eq!(empty.confidence, 0.0);

        let loaded = classify(
            "analyze analysis correlation trend pattern insight impact effect influence \
             compare comparison performance over time yearly monthly growth decline",
        );
        assert_eq!(loaded.confidence, 1.0);
    }

    #[test]
    fn test_query_type_serializes_as_snake_case() {
        let json = serde_json::to_string(&QueryType::TrendAnalysis).unwrap();
        assert_eq!(json, "\"trend_analysis\"");
        assert_eq!(QueryType::ComplexAnalysis.as_str(), "complex_analysis");
    }
}
