pub mod config;
pub mod error;
pub mod catalog;
pub mod recommend;
pub mod eval;
pub mod api;

pub use catalog::{AssessmentRecord, Catalog};
pub use config::Config;
pub use error::{RecommenderError, Result};
pub use recommend::{LexicalScorer, RecommendationFilters, Recommender};
