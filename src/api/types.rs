use crate::recommend::{Recommendation, RecommendationFilters};
use serde::{Deserialize, Serialize};

/// Body of `POST /recommend`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    /// Search query or job description
    pub query: String,
    #[serde(flatten)]
    pub filters: RecommendationFilters,
    /// Number of recommendations to return; signed so negative values can be rejected
    #[serde(default)]
    pub top_n: Option<i64>,
}

/// One assessment in the API response
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedAssessment {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    /// Minutes; 0 when the catalog has no duration
    pub duration: u32,
    pub test_type: Vec<String>,
    pub remote_support: &'static str,
    pub adaptive_support: &'static str,
    pub score: f32,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

impl From<&Recommendation<'_>> for RecommendedAssessment {
    fn from(rec: &Recommendation<'_>) -> Self {
        let record = rec.record;
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            url: record.url.clone(),
            description: record.description.clone(),
            duration: record.duration.unwrap_or(0),
            test_type: vec![record.test_type.clone()],
            remote_support: yes_no(record.remote_support),
            adaptive_support: yes_no(record.adaptive_irt),
            score: rec.score,
        }
    }
}

/// Response of `POST /recommend`
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub filters_applied: RecommendationFilters,
    pub recommended_assessments: Vec<RecommendedAssessment>,
}
