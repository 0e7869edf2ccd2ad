use crate::catalog::AssessmentRecord;
use crate::error::{RecommenderError, Result};
use crate::recommend::tokenize::{term_counts, TermCounts};

pub const DEFAULT_SATURATION_K1: f32 = 1.2;

/// Lexical relevance between a query and one catalog record.
///
/// Each distinct query term contributes `q * f / (f + k1)` where `q` is its
/// count in the query and `f` its count in the record text; the sum is divided
/// by the total query term count. The result lies in `[0, 1)`, grows with every
/// additional occurrence of a matching term, and depends only on the
/// (query, record) pair.
#[derive(Debug, Clone, Copy)]
pub struct LexicalScorer {
    k1: f32,
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self {
            k1: DEFAULT_SATURATION_K1,
        }
    }
}

impl LexicalScorer {
    pub fn new(k1: f32) -> Result<Self> {
        if !k1.is_finite() || k1 <= 0.0 {
            return Err(RecommenderError::InvalidParameter(format!(
                "saturation k1 must be a positive number, got {}",
                k1
            )));
        }
        Ok(Self { k1 })
    }

    pub fn k1(&self) -> f32 {
        self.k1
    }

    /// Score raw query text against a record. Empty text on either side scores 0.
    pub fn score(&self, query: &str, record: &AssessmentRecord) -> f32 {
        self.score_terms(&term_counts(query), &term_counts(&record.searchable_text()))
    }

    /// Score pre-tokenized query and record text.
    pub fn score_terms(&self, query: &TermCounts, record: &TermCounts) -> f32 {
        if query.is_empty() || record.is_empty() {
            return 0.0;
        }

        let total: u32 = query.values().sum();
        let matched: f32 = query
            .iter()
            .filter_map(|(term, &q)| {
                record
                    .get(term)
                    .map(|&f| q as f32 * f as f32 / (f as f32 + self.k1))
            })
            .sum();

        (matched / total as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> AssessmentRecord {
        AssessmentRecord::new("id", "", text)
    }

    #[test]
    fn test_rejects_bad_k1() {
        assert!(LexicalScorer::new(0.0).is_err());
        assert!(LexicalScorer::new(-1.0).is_err());
        assert!(LexicalScorer::new(f32::NAN).is_err());
        assert!(LexicalScorer::new(1.5).is_ok());
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let scorer = LexicalScorer::default();
        assert_eq!(scorer.score("", &record("java coding test")), 0.0);
        assert_eq!(scorer.score("java", &record("")), 0.0);
        assert_eq!(scorer.score("the of and", &record("java")), 0.0);
    }

    #[test]
    fn test_overlap_beats_no_overlap() {
        let scorer = LexicalScorer::default();
        let java = scorer.score("java developer test", &record("java coding test"));
        let leadership = scorer.score("java developer test", &record("leadership assessment"));
        assert!(java > 0.0);
        assert_eq!(leadership, 0.0);
    }

    #[test]
    fn test_exact_text_scores_at_least_disjoint_text() {
        let scorer = LexicalScorer::default();
        let query = "financial analyst numerical reasoning";
        let exact = scorer.score(query, &record(query));
        let disjoint = scorer.score(query, &record("customer service phone simulation"));
        assert!(exact >= disjoint);
        assert!(exact > 0.0);
    }

    #[test]
    fn test_monotonic_in_matching_term_frequency() {
        let scorer = LexicalScorer::default();
        let once = scorer.score("java", &record("java test"));
        let twice = scorer.score("java", &record("java java test"));
        let thrice = scorer.score("java", &record("java java java test"));
        assert!(once < twice);
        assert!(twice < thrice);
        assert!(thrice < 1.0);
    }

    #[test]
    fn test_deterministic() {
        let scorer = LexicalScorer::default();
        let r = record("sales manager leadership and coaching");
        let a = scorer.score("sales leadership", &r);
        let b = scorer.score("sales leadership", &r);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_name_is_part_of_record_text() {
        let scorer = LexicalScorer::default();
        let r = AssessmentRecord::new("1", "Python Programming", "");
        assert!(scorer.score("python", &r) > 0.0);
    }
}
