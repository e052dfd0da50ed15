//! Restaurant Rating Prediction Library
//!
//! Loads a pre-trained regression model from a compressed artifact,
//! normalizes restaurant attributes with the training-time encodings and
//! serves rating predictions through a small web form.

pub mod config;
pub mod encoding;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use crate::config::AppConfig;
pub use encoding::EncodingTable;
pub use error::RatingError;
pub use feature_extractor::FeatureExtractor;
pub use models::inference::InferenceEngine;
pub use types::{rating::RatingPrediction, request::PredictionRequest};
