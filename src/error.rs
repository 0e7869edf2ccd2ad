use thiserror::Error;

/// Main error type for the recommender
#[derive(Error, Debug)]
pub enum RecommenderError {
    /// Catalog file missing, unreadable, or malformed
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// Bad K, malformed filter value, or other rejected request input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Benchmark report could not be produced
    #[error("Report error: {0}")]
    Report(String),
}

/// Convenient Result type using RecommenderError
pub type Result<T> = std::result::Result<T, RecommenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RecommenderError::InvalidParameter("k must be positive".to_string());
        assert!(err.to_string().contains("Invalid parameter"));
        assert!(err.to_string().contains("k must be positive"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RecommenderError = io_err.into();
        assert!(matches!(err, RecommenderError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: RecommenderError = json_err.into();
        assert!(matches!(err, RecommenderError::Json(_)));
    }
}
