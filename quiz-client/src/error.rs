use quiz_types::QuizError;
use reqwest::StatusCode;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Api error: {0} - {1}")]
    Api(StatusCode, String),

    #[error("Failed to (de)serialize payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    #[error("Quiz player stopped before the attempt finished")]
    Abandoned,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
