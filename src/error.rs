//! Error types for model loading, input normalization and inference

use thiserror::Error;

/// Errors produced by the rating pipeline.
///
/// `ModelLoad` only occurs at startup. The other two are per-request and are
/// surfaced to callers after being logged.
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("failed to load {path}: {message}")]
    ModelLoad { path: String, message: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("prediction failed: {message}")]
    Prediction { message: String },
}

impl RatingError {
    pub fn model_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::Prediction {
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            RatingError::ModelLoad { .. } => "model_load",
            RatingError::InvalidInput { .. } => "invalid_input",
            RatingError::Prediction { .. } => "prediction",
        }
    }
}

pub type Result<T> = std::result::Result<T, RatingError>;
