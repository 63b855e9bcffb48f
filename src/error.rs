use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    #[error("Sentiment score must be within [0, 1], got {0}")]
    InvalidSentimentScore(f64),

    #[error("Post {id}: stored sentiment label '{stored}' disagrees with score {score} ('{derived}')")]
    SentimentMismatch {
        id: String,
        score: f64,
        stored: String,
        derived: String,
    },

    #[error("Unknown {kind} '{value}'. Allowed values are: {allowed}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("Search query must not be empty")]
    EmptyQuery,
}
