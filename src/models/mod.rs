//! Regression model loading and inference components

pub mod inference;
pub mod loader;
pub mod predictor;
pub mod tree;

pub use inference::InferenceEngine;
pub use loader::{LoadedModel, ModelLoader};
pub use predictor::{Predictor, RegressionModel};
pub use tree::RegressionTree;
