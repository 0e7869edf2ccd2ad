use crate::catalog::AssessmentRecord;
use crate::error::{RecommenderError, Result};
use serde::{Deserialize, Serialize};

/// Optional constraints applied conjunctively before scoring.
/// A `None` field places no constraint on the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationFilters {
    /// Record's job levels must contain this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    /// Inclusive lower bound in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<u32>,
    /// Inclusive upper bound in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<u32>,
    /// Record must support at least one of these languages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_support: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptive_irt: Option<bool>,
}

impl RecommendationFilters {
    /// Trim values, drop blank text filters, and reject malformed ones.
    pub fn normalized(&self) -> Result<Self> {
        let languages = match &self.languages {
            None => None,
            Some(list) => {
                let mut cleaned = Vec::with_capacity(list.len());
                for lang in list {
                    let lang = lang.trim();
                    if lang.is_empty() {
                        return Err(RecommenderError::InvalidParameter(
                            "languages must not contain blank entries".to_string(),
                        ));
                    }
                    cleaned.push(lang.to_string());
                }
                if cleaned.is_empty() {
                    None
                } else {
                    Some(cleaned)
                }
            }
        };

        if self.max_duration == Some(0) {
            return Err(RecommenderError::InvalidParameter(
                "max_duration must be greater than 0".to_string(),
            ));
        }

        if let (Some(min), Some(max)) = (self.min_duration, self.max_duration) {
            if min > max {
                return Err(RecommenderError::InvalidParameter(format!(
                    "min_duration ({}) exceeds max_duration ({})",
                    min, max
                )));
            }
        }

        Ok(Self {
            job_level: non_blank(&self.job_level),
            test_type: non_blank(&self.test_type),
            min_duration: self.min_duration,
            max_duration: self.max_duration,
            languages,
            remote_support: self.remote_support,
            adaptive_irt: self.adaptive_irt,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when `record` satisfies every present constraint.
    ///
    /// A record with unknown duration counts as 0 minutes: it passes any
    /// `max_duration` and fails a positive `min_duration`.
    pub fn matches(&self, record: &AssessmentRecord) -> bool {
        if let Some(level) = &self.job_level {
            if !record.job_levels.iter().any(|l| l == level) {
                return false;
            }
        }

        if let Some(test_type) = &self.test_type {
            if &record.test_type != test_type {
                return false;
            }
        }

        let minutes = record.duration.unwrap_or(0);
        if self.max_duration.is_some_and(|max| minutes > max) {
            return false;
        }
        if self.min_duration.is_some_and(|min| minutes < min) {
            return false;
        }

        if let Some(languages) = &self.languages {
            if !languages.iter().any(|lang| record.languages.contains(lang)) {
                return false;
            }
        }

        if self.remote_support.is_some_and(|want| record.remote_support != want) {
            return false;
        }

        if self.adaptive_irt.is_some_and(|want| record.adaptive_irt != want) {
            return false;
        }

        true
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
