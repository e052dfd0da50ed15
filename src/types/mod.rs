//! Type definitions for the rating service

pub mod rating;
pub mod request;

pub use rating::RatingPrediction;
pub use request::PredictionRequest;
