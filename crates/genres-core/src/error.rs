use thiserror::Error;

/// Top-level error type for the genres service.
#[derive(Error, Debug)]
pub enum GenresError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for GenresError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
