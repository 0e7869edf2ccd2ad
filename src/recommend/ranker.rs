use crate::catalog::{AssessmentRecord, Catalog};
use crate::error::{RecommenderError, Result};
use crate::recommend::filters::RecommendationFilters;
use crate::recommend::scorer::LexicalScorer;
use crate::recommend::tokenize::{term_counts, TermCounts};
use std::sync::Arc;

/// One ranked catalog entry
#[derive(Debug, Clone)]
pub struct Recommendation<'a> {
    pub record: &'a AssessmentRecord,
    pub score: f32,
    /// 1-indexed position in the result list
    pub rank: usize,
}

/// Scores and ranks catalog records for a query.
///
/// Holds the injected read-only catalog together with its pre-tokenized
/// record text, so each request only tokenizes the query. Safe to share
/// across request handlers behind an `Arc`.
#[derive(Debug)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    scorer: LexicalScorer,
    record_terms: Vec<TermCounts>,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, scorer: LexicalScorer) -> Self {
        let record_terms = catalog
            .all()
            .iter()
            .map(|r| term_counts(&r.searchable_text()))
            .collect();
        Self {
            catalog,
            scorer,
            record_terms,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scorer(&self) -> &LexicalScorer {
        &self.scorer
    }

    /// Rank catalog records for `query`.
    ///
    /// Filters are applied first; survivors are scored, stably sorted by
    /// descending score (ties keep catalog order) and truncated to `k`.
    /// Returns an empty list when nothing survives the filters.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `k` is 0 or a filter value is malformed.
    pub fn rank(
        &self,
        query: &str,
        filters: &RecommendationFilters,
        k: usize,
    ) -> Result<Vec<Recommendation<'_>>> {
        let start = std::time::Instant::now();

        if k == 0 {
            return Err(RecommenderError::InvalidParameter(
                "k must be a positive integer".to_string(),
            ));
        }
        let filters = filters.normalized()?;

        let query_terms = term_counts(query);
        let mut scored: Vec<(usize, f32)> = self
            .catalog
            .all()
            .iter()
            .enumerate()
            .filter(|(_, record)| filters.matches(record))
            .map(|(idx, _)| {
                (idx, self.scorer.score_terms(&query_terms, &self.record_terms[idx]))
            })
            .collect();

        let candidates = scored.len();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        let records = self.catalog.all();
        let results: Vec<Recommendation<'_>> = scored
            .into_iter()
            .enumerate()
            .map(|(pos, (idx, score))| Recommendation {
                record: &records[idx],
                score,
                rank: pos + 1,
            })
            .collect();

        log::debug!(
            "Ranked {} of {} records ({} after filters) in {:?}",
            results.len(),
            self.catalog.len(),
            candidates,
            start.elapsed()
        );

        Ok(results)
    }
}
