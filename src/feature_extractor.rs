//! Feature extraction for restaurant rating model inference.
//!
//! Turns a raw [`PredictionRequest`] into the numeric feature vector the
//! regression model was trained on. Booleans become 0/1, numeric fields are
//! range-checked and categorical fields are looked up in the fixed
//! training-time [`EncodingTable`].

use crate::encoding::{CategoricalColumn, EncodingTable};
use crate::error::{RatingError, Result};
use crate::types::request::{
    PredictionRequest, COST_FOR_TWO_MAX, COST_FOR_TWO_MIN, TOTAL_VOTES_MAX, TOTAL_VOTES_MIN,
};

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; 8] = [
    "online_orders",
    "book_table",
    "total_votes",
    "restaurant_location",
    "restaurant_type",
    "cuisine_types",
    "cost_for_two",
    "restaurant_service",
];

/// Feature extractor that transforms requests into model input features.
///
/// Features are produced in the exact column order used during training.
pub struct FeatureExtractor {
    encodings: EncodingTable,
}

impl FeatureExtractor {
    /// Create a feature extractor over a training-time encoding table.
    pub fn new(encodings: EncodingTable) -> Self {
        Self { encodings }
    }

    /// Extract features from a request.
    ///
    /// Fails with [`RatingError::InvalidInput`] naming the first offending
    /// field.
    pub fn extract(&self, request: &PredictionRequest) -> Result<Vec<f64>> {
        let mut features = Vec::with_capacity(FEATURE_NAMES.len());

        features.push(encode_yes_no("online_orders", &request.online_orders)?);
        features.push(encode_yes_no("book_table", &request.book_table)?);
        features.push(bounded(
            "total_votes",
            request.total_votes,
            TOTAL_VOTES_MIN,
            TOTAL_VOTES_MAX,
        )?);
        features.push(self.encode(CategoricalColumn::Location, &request.restaurant_location)?);
        features.push(self.encode(CategoricalColumn::Type, &request.restaurant_type)?);
        features.push(self.encode(CategoricalColumn::Cuisine, &request.cuisine_types)?);
        features.push(bounded(
            "cost_for_two",
            request.cost_for_two,
            COST_FOR_TWO_MIN,
            COST_FOR_TWO_MAX,
        )?);
        features.push(self.encode(CategoricalColumn::Service, &request.restaurant_service)?);

        Ok(features)
    }

    fn encode(&self, column: CategoricalColumn, value: &str) -> Result<f64> {
        self.encodings
            .code(column, value)
            .map(|code| code as f64)
            .ok_or_else(|| {
                RatingError::invalid_input(column.field(), format!("unknown category {:?}", value))
            })
    }

    /// Encoding table backing the categorical features
    pub fn encodings(&self) -> &EncodingTable {
        &self.encodings
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }

    /// Get feature names (model input order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

/// Map the literal "Yes"/"No" to 1/0
pub fn encode_yes_no(field: &'static str, value: &str) -> Result<f64> {
    match value {
        "Yes" => Ok(1.0),
        "No" => Ok(0.0),
        other => Err(RatingError::invalid_input(
            field,
            format!("expected \"Yes\" or \"No\", got {:?}", other),
        )),
    }
}

fn bounded(field: &'static str, value: i64, min: i64, max: i64) -> Result<f64> {
    if (min..=max).contains(&value) {
        Ok(value as f64)
    } else {
        Err(RatingError::invalid_input(
            field,
            format!("{} is outside {}..={}", value, min, max),
        ))
    }
}
