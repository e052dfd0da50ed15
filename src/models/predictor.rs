//! Regression model kinds and the predictor interface

use crate::error::{RatingError, Result};
use crate::models::tree::RegressionTree;
use serde::{Deserialize, Serialize};

/// Anything that maps one normalized feature vector to a rating
pub trait Predictor: Send + Sync {
    /// Predict a rating for one feature vector
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Short name of the model family
    fn kind(&self) -> &'static str;
}

/// Regression model deserialized from the model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressionModel {
    /// Bagged trees (random forest / extra trees): mean of tree outputs
    Forest { trees: Vec<RegressionTree> },

    /// Boosted trees: `init + learning_rate * sum of tree outputs`
    GradientBoosting {
        init: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    },

    /// Linear regression: `intercept + coefficients · features`
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
}

impl RegressionModel {
    /// Check that the model can be evaluated on `feature_count` features
    pub fn validate(&self, feature_count: usize) -> std::result::Result<(), String> {
        match self {
            RegressionModel::Forest { trees } => validate_trees(trees, feature_count),
            RegressionModel::GradientBoosting {
                init,
                learning_rate,
                trees,
            } => {
                if !init.is_finite() || !learning_rate.is_finite() {
                    return Err("init and learning_rate must be finite".to_string());
                }
                validate_trees(trees, feature_count)
            }
            RegressionModel::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != feature_count {
                    return Err(format!(
                        "expected {} coefficients, found {}",
                        feature_count,
                        coefficients.len()
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("linear model has non-finite parameters".to_string());
                }
                Ok(())
            }
        }
    }

    /// Number of trees, zero for linear models
    pub fn tree_count(&self) -> usize {
        match self {
            RegressionModel::Forest { trees } | RegressionModel::GradientBoosting { trees, .. } => {
                trees.len()
            }
            RegressionModel::Linear { .. } => 0,
        }
    }
}

fn validate_trees(trees: &[RegressionTree], feature_count: usize) -> std::result::Result<(), String> {
    if trees.is_empty() {
        return Err("ensemble contains no trees".to_string());
    }
    for (index, tree) in trees.iter().enumerate() {
        tree.validate(feature_count)
            .map_err(|e| format!("tree {}: {}", index, e))?;
    }
    Ok(())
}

fn sum_trees(trees: &[RegressionTree], features: &[f64]) -> Result<f64> {
    trees.iter().enumerate().try_fold(0.0, |acc, (index, tree)| {
        tree.predict(features).map(|v| acc + v).ok_or_else(|| {
            RatingError::prediction(format!(
                "tree {} needs more than {} features",
                index,
                features.len()
            ))
        })
    })
}

impl Predictor for RegressionModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        match self {
            RegressionModel::Forest { trees } => {
                if trees.is_empty() {
                    return Err(RatingError::prediction("forest has no trees"));
                }
                Ok(sum_trees(trees, features)? / trees.len() as f64)
            }
            RegressionModel::GradientBoosting {
                init,
                learning_rate,
                trees,
            } => Ok(init + learning_rate * sum_trees(trees, features)?),
            RegressionModel::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != features.len() {
                    return Err(RatingError::prediction(format!(
                        "linear model expects {} features, got {}",
                        coefficients.len(),
                        features.len()
                    )));
                }
                Ok(intercept
                    + coefficients
                        .iter()
                        .zip(features)
                        .map(|(c, x)| c * x)
                        .sum::<f64>())
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RegressionModel::Forest { .. } => "forest",
            RegressionModel::GradientBoosting { .. } => "gradient_boosting",
            RegressionModel::Linear { .. } => "linear",
        }
    }
}
