//! Evaluation framework: labeled queries, metrics (P@K, NDCG@K, MRR, diversity), and reports.

pub mod evaluator;
pub mod metrics;
pub mod query;
pub mod report;

pub use evaluator::{EvaluationReport, Evaluator, MetricSummary, QueryMetrics};
pub use metrics::{diversity, ndcg_at_k, precision_at_k, reciprocal_rank};
pub use query::{load_queries, sample_queries, EvaluationQuery, QueryFile};
