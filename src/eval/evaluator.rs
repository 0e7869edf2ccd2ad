use crate::error::{RecommenderError, Result};
use crate::eval::metrics::{diversity, mean, ndcg_at_k, precision_at_k, reciprocal_rank};
use crate::eval::query::{EvaluationQuery, QueryFile};
use crate::recommend::Recommender;
use serde::Serialize;
use std::collections::HashSet;

/// Metrics for one evaluation query
#[derive(Debug, Clone, Serialize)]
pub struct QueryMetrics {
    pub query: String,
    pub precision_at_k: f64,
    pub ndcg_at_k: f64,
    pub mrr: f64,
    /// Diversity of test types in the recommended list.
    pub diversity: f64,
    /// Diversity of job levels in the recommended list.
    pub job_level_diversity: f64,
    pub recommended: Vec<String>,
}

/// Arithmetic mean of each metric across evaluated queries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    pub precision_at_k: f64,
    pub ndcg_at_k: f64,
    pub mrr: f64,
    pub diversity: f64,
    pub job_level_diversity: f64,
}

impl MetricSummary {
    fn from_queries(per_query: &[QueryMetrics]) -> Self {
        let column = |f: fn(&QueryMetrics) -> f64| -> f64 {
            mean(&per_query.iter().map(f).collect::<Vec<_>>())
        };
        Self {
            precision_at_k: column(|m| m.precision_at_k),
            ndcg_at_k: column(|m| m.ndcg_at_k),
            mrr: column(|m| m.mrr),
            diversity: column(|m| m.diversity),
            job_level_diversity: column(|m| m.job_level_diversity),
        }
    }
}

/// Benchmark output: per-query metrics plus their aggregate
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub k: usize,
    pub generated_at: String,
    pub evaluated: usize,
    pub skipped: usize,
    pub aggregate: MetricSummary,
    pub per_query: Vec<QueryMetrics>,
}

/// Runs labeled queries through the recommender and scores the results.
pub struct Evaluator<'a> {
    recommender: &'a Recommender,
}

impl<'a> Evaluator<'a> {
    pub fn new(recommender: &'a Recommender) -> Self {
        Self { recommender }
    }

    /// Evaluate `queries` at cut-off `k`.
    ///
    /// Queries without relevant ids, or whose filters are rejected by the
    /// ranker, are skipped with a warning; the rest of the batch still runs.
    pub fn evaluate(&self, queries: &[EvaluationQuery], k: usize) -> Result<EvaluationReport> {
        if k == 0 {
            return Err(RecommenderError::InvalidParameter(
                "k must be a positive integer".to_string(),
            ));
        }

        let catalog = self.recommender.catalog();
        let available_test_types = catalog.test_types().len();
        let available_job_levels = catalog.job_levels().len();

        let mut per_query = Vec::with_capacity(queries.len());
        let mut skipped = 0;

        for (idx, query) in queries.iter().enumerate() {
            if query.relevant_ids.is_empty() {
                log::warn!("Skipping query #{} ({:?}): no relevant ids", idx, query.query);
                skipped += 1;
                continue;
            }

            for id in &query.relevant_ids {
                if !catalog.contains(id) {
                    log::warn!("Query #{} lists unknown assessment id {:?}", idx, id);
                }
            }

            let results = match self.recommender.rank(&query.query, &query.filters, k) {
                Ok(results) => results,
                Err(e) => {
                    log::warn!("Skipping query #{} ({:?}): {}", idx, query.query, e);
                    skipped += 1;
                    continue;
                }
            };

            let relevant: HashSet<&str> = query.relevant_ids.iter().map(String::as_str).collect();
            let recommended: Vec<&str> = results.iter().map(|r| r.record.id.as_str()).collect();
            let test_types: Vec<Vec<&str>> = results
                .iter()
                .map(|r| vec![r.record.test_type.as_str()])
                .collect();
            let job_levels: Vec<Vec<&str>> = results
                .iter()
                .map(|r| r.record.job_levels.iter().map(String::as_str).collect())
                .collect();

            let metrics = QueryMetrics {
                query: query.query.clone(),
                precision_at_k: precision_at_k(&recommended, &relevant, k),
                ndcg_at_k: ndcg_at_k(&recommended, &relevant, k),
                mrr: reciprocal_rank(&recommended, &relevant, k),
                diversity: diversity(&test_types, available_test_types),
                job_level_diversity: diversity(&job_levels, available_job_levels),
                recommended: recommended.iter().map(|id| id.to_string()).collect(),
            };
            log::debug!(
                "Query #{}: P@{k}={:.3} NDCG@{k}={:.3} MRR={:.3}",
                idx,
                metrics.precision_at_k,
                metrics.ndcg_at_k,
                metrics.mrr,
            );
            per_query.push(metrics);
        }

        if per_query.is_empty() && !queries.is_empty() {
            log::warn!("No evaluable queries: all {} were skipped", queries.len());
        }

        Ok(EvaluationReport {
            k,
            generated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            evaluated: per_query.len(),
            skipped,
            aggregate: MetricSummary::from_queries(&per_query),
            per_query,
        })
    }

    /// Evaluate a loaded query file; entries that failed to parse count as skipped.
    pub fn evaluate_file(&self, file: &QueryFile, k: usize) -> Result<EvaluationReport> {
        let mut report = self.evaluate(&file.queries, k)?;
        report.skipped += file.malformed;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AssessmentRecord, Catalog};
    use crate::recommend::{LexicalScorer, RecommendationFilters};
    use std::sync::Arc;

    fn recommender() -> Recommender {
        let catalog = Catalog::from_records(vec![
            AssessmentRecord::new("1", "", "java coding test")
                .with_test_type("Knowledge")
                .with_job_levels(&["Entry"]),
            AssessmentRecord::new("2", "", "leadership assessment")
                .with_test_type("Personality")
                .with_job_levels(&["Manager"]),
            AssessmentRecord::new("3", "", "python coding test")
                .with_test_type("Knowledge")
                .with_job_levels(&["Entry", "Graduate"]),
        ])
        .unwrap();
        Recommender::new(Arc::new(catalog), LexicalScorer::default())
    }

    #[test]
    fn test_perfect_single_query() {
        let recommender = recommender();
        let evaluator = Evaluator::new(&recommender);
        let queries = vec![EvaluationQuery::new("java developer test", &["1"])];

        let report = evaluator.evaluate(&queries, 1).unwrap();
        assert_eq!(report.evaluated, 1);
        assert_eq!(report.skipped, 0);
        let m = &report.per_query[0];
        assert_eq!(m.recommended, vec!["1"]);
        assert!((m.precision_at_k - 1.0).abs() < 1e-9);
        assert!((m.mrr - 1.0).abs() < 1e-9);
        assert!((m.ndcg_at_k - 1.0).abs() < 1e-9);
        assert_eq!(m.diversity, 0.0);
    }

    #[test]
    fn test_empty_relevant_is_skipped() {
        let recommender = recommender();
        let evaluator = Evaluator::new(&recommender);
        let queries = vec![
            EvaluationQuery::new("leadership", &[]),
            EvaluationQuery::new("leadership", &["2"]),
        ];

        let report = evaluator.evaluate(&queries, 2).unwrap();
        assert_eq!(report.evaluated, 1);
        assert_eq!(report.skipped, 1);
        assert!((report.aggregate.mrr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_filters_are_skipped() {
        let recommender = recommender();
        let evaluator = Evaluator::new(&recommender);
        let mut bad = EvaluationQuery::new("java", &["1"]);
        bad.filters = RecommendationFilters {
            max_duration: Some(0),
            ..Default::default()
        };

        let report = evaluator.evaluate(&[bad], 2).unwrap();
        assert_eq!(report.evaluated, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.aggregate, MetricSummary::default());
    }

    #[test]
    fn test_zero_k_rejected() {
        let recommender = recommender();
        let evaluator = Evaluator::new(&recommender);
        let queries = vec![EvaluationQuery::new("java", &["1"])];
        assert!(matches!(
            evaluator.evaluate(&queries, 0),
            Err(RecommenderError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_aggregate_is_mean() {
        let recommender = recommender();
        let evaluator = Evaluator::new(&recommender);
        let queries = vec![
            // "java" query ranks 1 first: hit at rank 1
            EvaluationQuery::new("java developer test", &["1"]),
            // relevant item 2 has no overlap, ranks last of 3 at K = 2: miss
            EvaluationQuery::new("java developer test", &["2"]),
        ];

        let report = evaluator.evaluate(&queries, 2).unwrap();
        assert_eq!(report.evaluated, 2);
        assert!((report.aggregate.mrr - 0.5).abs() < 1e-9);
        assert!((report.aggregate.precision_at_k - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_filters_apply_during_evaluation() {
        let recommender = recommender();
        let evaluator = Evaluator::new(&recommender);
        let mut query = EvaluationQuery::new("coding test", &["3"]);
        query.filters.job_level = Some("Graduate".to_string());

        let report = evaluator.evaluate(&[query], 3).unwrap();
        assert_eq!(report.per_query[0].recommended, vec!["3"]);
        assert!((report.per_query[0].mrr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_metrics_bounded() {
        let recommender = recommender();
        let evaluator = Evaluator::new(&recommender);
        let queries = vec![
            EvaluationQuery::new("coding test", &["1", "3"]),
            EvaluationQuery::new("leadership assessment", &["2", "missing"]),
            EvaluationQuery::new("", &["1"]),
        ];
        let report = evaluator.evaluate(&queries, 3).unwrap();
        for m in &report.per_query {
            for value in [m.precision_at_k, m.ndcg_at_k, m.mrr, m.diversity, m.job_level_diversity] {
                assert!((0.0..=1.0).contains(&value));
            }
        }
        // coding test at K = 3 spans Knowledge and Personality
        assert!(report.per_query[0].diversity > 0.0);
    }

    #[test]
    fn test_malformed_file_entries_count_as_skipped() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("queries.json");
        std::fs::write(
            &path,
            r#"[{"query": "java developer test", "relevant_ids": ["1"]}, {"relevant_ids": ["2"]}]"#,
        )
        .unwrap();
        let file = crate::eval::load_queries(&path).unwrap();

        let recommender = recommender();
        let report = Evaluator::new(&recommender).evaluate_file(&file, 1).unwrap();
        assert_eq!(report.evaluated, 1);
        assert_eq!(report.skipped, 1);
        assert!((report.per_query[0].mrr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bundled_benchmark_data() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let catalog = Catalog::load(&root.join("processed/shl_assessments_detailed.json")).unwrap();
        let file = crate::eval::load_queries(&root.join("evaluation/test_queries.json")).unwrap();
        assert_eq!(file.malformed, 0);
        let queries = file.queries;
        for query in &queries {
            for id in &query.relevant_ids {
                assert!(catalog.contains(id), "unknown relevant id {}", id);
            }
        }

        let recommender = Recommender::new(Arc::new(catalog), LexicalScorer::default());
        let report = Evaluator::new(&recommender).evaluate(&queries, 5).unwrap();
        assert_eq!(report.evaluated, queries.len());
        assert_eq!(report.skipped, 0);
        assert!(report.aggregate.mrr > 0.0);
    }
}
