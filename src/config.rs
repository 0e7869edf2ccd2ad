use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub recommender: RecommenderConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

/// Catalog location and process-wide settings
#[derive(Debug, Clone, Deserialize)]
pub struct RecommenderConfig {
    /// Processed catalog JSON produced by the data-preparation job.
    pub catalog_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Ranking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,
    /// Term-frequency saturation constant for the lexical scorer.
    #[serde(default = "default_saturation_k1")]
    pub saturation_k1: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
            saturation_k1: default_saturation_k1(),
        }
    }
}

/// Offline benchmark configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    #[serde(default = "default_queries_path")]
    pub queries_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_eval_k")]
    pub k: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            queries_path: default_queries_path(),
            output_dir: default_output_dir(),
            k: default_eval_k(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_max_top_n() -> usize {
    10
}

fn default_saturation_k1() -> f32 {
    1.2
}

fn default_queries_path() -> PathBuf {
    PathBuf::from("data/evaluation/test_queries.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/evaluation")
}

fn default_eval_k() -> usize {
    5
}

fn default_http_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in SHL_RECOMMENDER_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = std::env::var("SHL_RECOMMENDER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_file(&config_path)
    }

    /// Parse and validate a specific config file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if !self.recommender.catalog_path.is_file() {
            anyhow::bail!(
                "catalog_path does not exist: {}. Point recommender.catalog_path at the processed catalog JSON.",
                self.recommender.catalog_path.display()
            );
        }

        if self.search.default_top_n == 0 {
            anyhow::bail!("search.default_top_n must be greater than 0");
        }

        if self.search.max_top_n < self.search.default_top_n {
            anyhow::bail!("search.max_top_n must be at least search.default_top_n");
        }

        if !self.search.saturation_k1.is_finite() || self.search.saturation_k1 <= 0.0 {
            anyhow::bail!("search.saturation_k1 must be a positive number");
        }

        if self.eval.k == 0 {
            anyhow::bail!("eval.k must be greater than 0");
        }

        Ok(())
    }

    /// Get catalog path
    pub fn catalog_path(&self) -> &Path {
        &self.recommender.catalog_path
    }

    /// Log filter used when RUST_LOG is not set
    pub fn log_level(&self) -> &str {
        &self.recommender.log_level
    }

    /// Log filter for process startup: the configured level, or `info` when
    /// the config failed to load so the failure is still logged.
    pub fn startup_log_level(loaded: &Result<Config>) -> String {
        match loaded {
            Ok(config) => config.log_level().to_string(),
            Err(_) => default_log_level(),
        }
    }
}
