//! Custom error types for benchmark operations

use thiserror::Error;

/// Benchmark-related errors
///
/// Provider failures never surface as this type: adapters fold them into
/// [`crate::providers::ProviderOutcome`] and the scheduler records them.
#[derive(Error, Debug)]
pub enum BenchmarkError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Required provider credential is absent
    #[error("Missing credential: {variable} environment variable is required")]
    MissingCredential {
        variable: String,
    },

    /// Malformed dataset row or file
    #[error("Dataset error at row {row}: {message}")]
    DatasetError {
        row: usize,
        message: String,
    },

    /// File operation error
    #[error("File error: {path} - {message}")]
    FileError {
        path: String,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Layered configuration error
    #[error("Config source error: {0}")]
    ConfigSourceError(#[from] config::ConfigError),
}

impl BenchmarkError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        BenchmarkError::ConfigError {
            message: message.into(),
        }
    }

    /// Shorthand for a dataset error on a given row
    pub fn dataset(row: usize, message: impl Into<String>) -> Self {
        BenchmarkError::DatasetError {
            row,
            message: message.into(),
        }
    }
}

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchmarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BenchmarkError::MissingCredential {
            variable: "DEEPL_API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing credential: DEEPL_API_KEY environment variable is required"
        );

        let err = BenchmarkError::dataset(7, "empty reference");
        assert_eq!(err.to_string(), "Dataset error at row 7: empty reference");
    }
}
