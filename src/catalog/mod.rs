//! Read-only, in-memory catalog of SHL assessments.

pub mod record;

pub use record::{parse_duration, AssessmentRecord};

use crate::error::{RecommenderError, Result};
use serde_json::Value as JsonValue;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Catalog loaded once at startup. There are no update operations; reload to refresh.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<AssessmentRecord>,
    index_by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Load the processed catalog file.
    ///
    /// Accepts either `{"metadata": {...}, "assessments": [...]}` or a bare array
    /// of assessments. Any missing/malformed entry fails the whole load: no
    /// partial catalog is ever served.
    pub fn load(path: &Path) -> Result<Self> {
        let start = std::time::Instant::now();

        let content = std::fs::read_to_string(path).map_err(|e| {
            RecommenderError::DataLoad(format!("failed to read {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_json_str(&content)
            .map_err(|e| match e {
                RecommenderError::DataLoad(msg) => {
                    RecommenderError::DataLoad(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })?;

        log::info!(
            "Loaded {} assessments from {} in {:?}",
            catalog.len(),
            path.display(),
            start.elapsed()
        );
        Ok(catalog)
    }

    /// Parse catalog JSON text (see [`Catalog::load`] for the accepted shapes).
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(content)
            .map_err(|e| RecommenderError::DataLoad(format!("invalid JSON: {}", e)))?;

        let entries = match value {
            JsonValue::Array(items) => items,
            JsonValue::Object(mut map) => match map.remove("assessments") {
                Some(JsonValue::Array(items)) => items,
                Some(_) => {
                    return Err(RecommenderError::DataLoad(
                        "\"assessments\" must be an array".to_string(),
                    ))
                }
                None => {
                    return Err(RecommenderError::DataLoad(
                        "missing \"assessments\" array".to_string(),
                    ))
                }
            },
            _ => {
                return Err(RecommenderError::DataLoad(
                    "catalog must be an object or an array".to_string(),
                ))
            }
        };

        let records = entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| record::record_from_json(entry, position))
            .collect::<Result<Vec<_>>>()?;

        Self::from_records(records)
    }

    /// Build a catalog from already-constructed records, keeping their order.
    pub fn from_records(records: Vec<AssessmentRecord>) -> Result<Self> {
        let mut index_by_id = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if index_by_id.insert(record.id.clone(), idx).is_some() {
                return Err(RecommenderError::DataLoad(format!(
                    "duplicate assessment id: {}",
                    record.id
                )));
            }
        }
        Ok(Self {
            records,
            index_by_id,
        })
    }

    /// All records in catalog order
    pub fn all(&self) -> &[AssessmentRecord] {
        &self.records
    }

    /// Records matching `predicate`, in catalog order
    pub fn by_filter<F>(&self, predicate: F) -> Vec<&AssessmentRecord>
    where
        F: Fn(&AssessmentRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&AssessmentRecord> {
        self.index_by_id.get(id).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct job levels, sorted
    pub fn job_levels(&self) -> Vec<String> {
        distinct(self.records.iter().flat_map(|r| r.job_levels.iter()))
    }

    /// Distinct test types, sorted
    pub fn test_types(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| &r.test_type))
    }

    /// Distinct languages, sorted
    pub fn languages(&self) -> Vec<String> {
        distinct(self.records.iter().flat_map(|r| r.languages.iter()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
