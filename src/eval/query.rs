//! Labeled evaluation queries for the benchmark.

use crate::error::{RecommenderError, Result};
use crate::recommend::RecommendationFilters;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::Path;

/// Single evaluation query with its ground-truth relevant assessments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationQuery {
    /// Job description text run through the recommender.
    pub query: String,
    /// Ids of the assessments considered relevant. Older query files call
    /// this `relevant_assessments` and list assessment names.
    #[serde(default, alias = "relevant_assessments")]
    pub relevant_ids: Vec<String>,
    /// Filters applied while ranking this query (job_level, languages, ...).
    #[serde(flatten)]
    pub filters: RecommendationFilters,
}

impl EvaluationQuery {
    pub fn new(query: impl Into<String>, relevant_ids: &[&str]) -> Self {
        Self {
            query: query.into(),
            relevant_ids: relevant_ids.iter().map(|id| id.to_string()).collect(),
            filters: RecommendationFilters::default(),
        }
    }
}

/// Queries read from a file, plus the number of entries that failed to parse.
#[derive(Debug, Clone, Default)]
pub struct QueryFile {
    pub queries: Vec<EvaluationQuery>,
    pub malformed: usize,
}

/// Load queries from a JSON array file.
///
/// Entries that do not parse are skipped with a warning and counted in
/// `malformed`; only an unreadable file or a non-array document fails.
pub fn load_queries(path: &Path) -> Result<QueryFile> {
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<JsonValue> = serde_json::from_str(&content).map_err(|e| {
        RecommenderError::InvalidParameter(format!(
            "invalid queries JSON in {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut file = QueryFile::default();
    for (idx, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<EvaluationQuery>(entry) {
            Ok(query) => file.queries.push(query),
            Err(e) => {
                log::warn!("Skipping query #{} in {}: {}", idx, path.display(), e);
                file.malformed += 1;
            }
        }
    }
    Ok(file)
}

/// Built-in queries used when no query file exists.
pub fn sample_queries() -> Vec<EvaluationQuery> {
    let mut admin = EvaluationQuery::new(
        "Entry level administrative assistant role with focus on customer service",
        &["Administrative Professional - Short Form"],
    );
    admin.filters.job_level = Some("Entry-Level".to_string());
    admin.filters.languages = Some(vec!["English (USA)".to_string()]);

    let mut sales = EvaluationQuery::new(
        "Sales manager role requiring leadership skills",
        &["Agency Manager Solution"],
    );
    sales.filters.job_level = Some("Manager".to_string());
    sales.filters.languages = Some(vec!["English (USA)".to_string()]);

    vec![admin, sales]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_original_query_format() {
        let json = r#"[
            {
                "query": "Sales manager role requiring leadership skills",
                "relevant_assessments": ["Agency Manager Solution"],
                "job_level": "Manager",
                "languages": ["english"]
            }
        ]"#;
        let queries: Vec<EvaluationQuery> = serde_json::from_str(json).unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].relevant_ids, vec!["Agency Manager Solution"]);
        assert_eq!(queries[0].filters.job_level.as_deref(), Some("Manager"));
        assert_eq!(
            queries[0].filters.languages,
            Some(vec!["english".to_string()])
        );
    }

    #[test]
    fn test_parse_relevant_ids_without_filters() {
        let json = r#"[{"query": "java developer test", "relevant_ids": ["1"]}]"#;
        let queries: Vec<EvaluationQuery> = serde_json::from_str(json).unwrap();
        assert_eq!(queries[0].relevant_ids, vec!["1"]);
        assert!(queries[0].filters.is_empty());
    }

    #[test]
    fn test_missing_relevant_defaults_to_empty() {
        let json = r#"[{"query": "anything"}]"#;
        let queries: Vec<EvaluationQuery> = serde_json::from_str(json).unwrap();
        assert!(queries[0].relevant_ids.is_empty());
    }

    #[test]
    fn test_load_queries_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("queries.json");
        fs::write(&path, r#"[{"query": "q", "relevant_ids": ["a", "b"]}]"#).unwrap();
        let file = load_queries(&path).unwrap();
        assert_eq!(file.queries[0].relevant_ids.len(), 2);
        assert_eq!(file.malformed, 0);
    }

    #[test]
    fn test_load_queries_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(load_queries(&missing), Err(RecommenderError::Io(_))));

        let bad = temp_dir.path().join("bad.json");
        fs::write(&bad, r#"{"query": "not an array"}"#).unwrap();
        assert!(matches!(
            load_queries(&bad),
            Err(RecommenderError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("queries.json");
        fs::write(
            &path,
            r#"[
                {"query": "java developer test", "relevant_ids": ["1"]},
                {"relevant_ids": ["2"]},
                {"query": "short test", "relevant_ids": ["3"], "max_duration": "thirty"},
                {"query": "leadership", "relevant_ids": ["2"]}
            ]"#,
        )
        .unwrap();

        let file = load_queries(&path).unwrap();
        assert_eq!(file.malformed, 2);
        let texts: Vec<&str> = file.queries.iter().map(|q| q.query.as_str()).collect();
        assert_eq!(texts, vec!["java developer test", "leadership"]);
    }

    #[test]
    fn test_sample_queries_have_ground_truth() {
        let samples = sample_queries();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|q| !q.relevant_ids.is_empty()));
    }
}
