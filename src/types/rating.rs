//! Rating prediction result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Predicted rating for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingPrediction {
    /// Identifier assigned to the request
    pub request_id: String,

    /// Raw model output, unmodified
    pub rating: f64,

    /// Name of the model that produced the rating
    pub model: String,

    /// Prediction timestamp
    pub predicted_at: DateTime<Utc>,
}

impl RatingPrediction {
    pub fn new(rating: f64, model: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            rating,
            model: model.into(),
            predicted_at: Utc::now(),
        }
    }

    /// Sentence shown to the user, rating rounded to two decimals
    pub fn message(&self) -> String {
        format!(
            "The predicted rating for the restaurant is: {:.2}",
            self.rating
        )
    }
}
