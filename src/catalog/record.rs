//! Assessment record type and its mapping from the processed catalog format.

use crate::error::{RecommenderError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

const DEFAULT_TEST_TYPE: &str = "General Assessment";

/// One SHL assessment from the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub test_type: String,
    pub job_levels: Vec<String>,
    pub languages: Vec<String>,
    /// Completion time in minutes, when the source states one.
    pub duration: Option<u32>,
    pub remote_support: bool,
    pub adaptive_irt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_link: Option<String>,
}

impl AssessmentRecord {
    /// Minimal record used by synthetic catalogs; remaining fields take catalog defaults.
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: String::new(),
            description: description.into(),
            test_type: DEFAULT_TEST_TYPE.to_string(),
            job_levels: Vec::new(),
            languages: Vec::new(),
            duration: None,
            remote_support: false,
            adaptive_irt: false,
            pdf_link: None,
        }
    }

    pub fn with_test_type(mut self, test_type: impl Into<String>) -> Self {
        self.test_type = test_type.into();
        self
    }

    pub fn with_job_levels(mut self, levels: &[&str]) -> Self {
        self.job_levels = levels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_support(mut self, remote_support: bool, adaptive_irt: bool) -> Self {
        self.remote_support = remote_support;
        self.adaptive_irt = adaptive_irt;
        self
    }

    /// Text the scorer matches against: name followed by description.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// Assessment as written by the data-preparation job.
#[derive(Debug, Deserialize)]
struct RawAssessment {
    #[serde(default)]
    id: Option<JsonValue>,
    name: String,
    url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    job_levels: Option<Vec<String>>,
    #[serde(default)]
    languages: Option<Vec<String>>,
    #[serde(default)]
    duration: Option<JsonValue>,
    #[serde(default)]
    remote_testing_support: Option<bool>,
    #[serde(default)]
    adaptive_irt_support: Option<bool>,
    #[serde(default)]
    pdf_link: Option<String>,
    #[serde(default)]
    test_type: Option<String>,
}

/// Convert one catalog entry into a record. `position` is only used in error messages.
pub(crate) fn record_from_json(value: JsonValue, position: usize) -> Result<AssessmentRecord> {
    let raw: RawAssessment = serde_json::from_value(value).map_err(|e| {
        RecommenderError::DataLoad(format!("assessment #{}: {}", position, e))
    })?;

    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(RecommenderError::DataLoad(format!(
            "assessment #{}: name is empty",
            position
        )));
    }

    let id = match raw.id {
        None | Some(JsonValue::Null) => name.clone(),
        Some(JsonValue::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(RecommenderError::DataLoad(format!(
                "assessment #{} ({}): unsupported id {}",
                position, name, other
            )))
        }
    };

    let test_type = raw
        .test_type
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TEST_TYPE.to_string());

    Ok(AssessmentRecord {
        id,
        name,
        url: raw.url,
        description: raw.description.unwrap_or_default(),
        test_type,
        job_levels: clean_list(raw.job_levels),
        languages: clean_list(raw.languages),
        duration: raw.duration.as_ref().and_then(duration_from_json),
        remote_support: raw.remote_testing_support.unwrap_or(false),
        adaptive_irt: raw.adaptive_irt_support.unwrap_or(false),
        pdf_link: raw.pdf_link,
    })
}

fn clean_list(values: Option<Vec<String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.unwrap_or_default() {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

fn duration_from_json(value: &JsonValue) -> Option<u32> {
    match value {
        JsonValue::Number(n) => n.as_u64().and_then(|m| u32::try_from(m).ok()),
        JsonValue::String(s) => parse_duration(s),
        _ => None,
    }
}

/// Parse free-text durations such as "30 minutes" or
/// "Approximate Completion Time in minutes = 45" into minutes.
/// Takes the first run of digits; returns None when there is none.
pub fn parse_duration(text: &str) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("Invalid regex pattern"));
    digits.find(text).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30 minutes"), Some(30));
        assert_eq!(parse_duration("Approximate Completion Time in minutes = 45"), Some(45));
        assert_eq!(parse_duration("Untimed"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("max 99999999999999 minutes"), None);
    }

    #[test]
    fn test_record_from_original_format() {
        let value = json!({
            "name": "Java 8 (New)",
            "url": "https://www.shl.com/products/java-8-new/",
            "description": "Multi-choice test that measures knowledge of Java.",
            "job_levels": ["Mid-Professional", "Professional Individual Contributor", ""],
            "languages": ["English (USA)"],
            "duration": "18 minutes",
            "remote_testing_support": true,
            "adaptive_irt_support": false,
            "test_type": "Knowledge & Skills",
            "embedding": [0.1, 0.2],
            "metadata": {"scrape_time": "2025-04-08 20:51:39", "scraper_user": "x"}
        });

        let record = record_from_json(value, 0).unwrap();
        assert_eq!(record.id, "Java 8 (New)");
        assert_eq!(record.duration, Some(18));
        assert_eq!(record.job_levels.len(), 2);
        assert!(record.remote_support);
        assert!(!record.adaptive_irt);
        assert_eq!(record.test_type, "Knowledge & Skills");
    }

    #[test]
    fn test_record_defaults() {
        let value = json!({"id": 7, "name": "OPQ32r", "url": "u", "description": null});
        let record = record_from_json(value, 3).unwrap();
        assert_eq!(record.id, "7");
        assert_eq!(record.description, "");
        assert_eq!(record.test_type, DEFAULT_TEST_TYPE);
        assert_eq!(record.duration, None);
        assert!(record.job_levels.is_empty());
    }

    #[test]
    fn test_record_missing_required_field() {
        let err = record_from_json(json!({"name": "No URL"}), 4).unwrap_err();
        assert!(matches!(err, RecommenderError::DataLoad(_)));
        assert!(err.to_string().contains("#4"));
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn test_record_blank_name_rejected() {
        let err = record_from_json(json!({"name": "  ", "url": "u"}), 0).unwrap_err();
        assert!(matches!(err, RecommenderError::DataLoad(_)));
    }

    #[test]
    fn test_searchable_text_joins_name_and_description() {
        let record = AssessmentRecord::new("1", "Java Coding", "test of java");
        assert_eq!(record.searchable_text(), "Java Coding test of java");
    }
}
