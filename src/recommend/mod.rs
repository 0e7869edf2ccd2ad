//! Similarity scoring, filtering and ranking over the catalog.

pub mod filters;
pub mod ranker;
pub mod scorer;
pub mod tokenize;

pub use filters::RecommendationFilters;
pub use ranker::{Recommendation, Recommender};
pub use scorer::LexicalScorer;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;

/// Load the configured catalog and wrap it in a recommender.
/// Fails with `DataLoad` when the catalog cannot be loaded.
pub fn load_recommender(config: &Config) -> Result<Recommender> {
    let catalog = Catalog::load(config.catalog_path())?;
    let scorer = LexicalScorer::new(config.search.saturation_k1)?;
    Ok(Recommender::new(Arc::new(catalog), scorer))
}
