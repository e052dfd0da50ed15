//! Inference engine: normalization followed by a single model call

use crate::config::AppConfig;
use crate::encoding::EncodingTable;
use crate::error::{RatingError, Result};
use crate::feature_extractor::FeatureExtractor;
use crate::models::loader::ModelLoader;
use crate::models::predictor::Predictor;
use crate::types::rating::RatingPrediction;
use crate::types::request::PredictionRequest;
use tracing::{debug, error, info, warn};

/// Rating inference engine.
///
/// Holds the feature extractor and the loaded predictor. Both are immutable
/// after construction, so one engine can be shared by every request.
pub struct InferenceEngine {
    extractor: FeatureExtractor,
    predictor: Box<dyn Predictor>,
    model_name: String,
    model_version: String,
}

impl InferenceEngine {
    /// Create a new inference engine from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let encodings = match &config.model.encodings_path {
            Some(path) => EncodingTable::load(path)?,
            None => {
                info!("No encodings path configured, using builtin encoding table");
                EncodingTable::builtin()?
            }
        };

        let loaded = ModelLoader::new().load_model(&config.model.path)?;

        Ok(Self::with_predictor(
            FeatureExtractor::new(encodings),
            Box::new(loaded.model),
            loaded.name,
            loaded.version,
        ))
    }

    /// Create an inference engine around an already constructed predictor
    pub fn with_predictor(
        extractor: FeatureExtractor,
        predictor: Box<dyn Predictor>,
        model_name: impl Into<String>,
        model_version: impl Into<String>,
    ) -> Self {
        let engine = Self {
            extractor,
            predictor,
            model_name: model_name.into(),
            model_version: model_version.into(),
        };

        info!(
            model = %engine.model_name,
            version = %engine.model_version,
            kind = engine.predictor.kind(),
            features = engine.extractor.feature_count(),
            "Inference engine initialized"
        );

        engine
    }

    /// Get the loaded model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Get the loaded model version
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Get the feature extractor
    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Normalize a request and return the raw model output.
    ///
    /// The predictor is invoked exactly once per successful normalization
    /// and its result is returned unmodified.
    pub fn normalize_and_predict(&self, request: &PredictionRequest) -> Result<f64> {
        let features = self.extractor.extract(request).map_err(|e| {
            warn!(error = %e, "Rejected prediction request");
            e
        })?;

        self.predict_features(&features)
    }

    /// Run the predictor on an already normalized feature vector
    pub fn predict_features(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.extractor.feature_count() {
            let err = RatingError::prediction(format!(
                "expected {} features, got {}",
                self.extractor.feature_count(),
                features.len()
            ));
            error!(model = %self.model_name, error = %err, "Inference failed");
            return Err(err);
        }

        let rating = self
            .predictor
            .predict(features)
            .and_then(|rating| {
                if rating.is_finite() {
                    Ok(rating)
                } else {
                    Err(RatingError::prediction(format!(
                        "model returned non-finite rating {}",
                        rating
                    )))
                }
            })
            .map_err(|e| {
                error!(
                    model = %self.model_name,
                    features = ?features,
                    error = %e,
                    "Inference failed"
                );
                e
            })?;

        debug!(
            model = %self.model_name,
            features = ?features,
            rating = rating,
            "Inference complete"
        );

        Ok(rating)
    }

    /// Predict a rating and wrap it with request metadata
    pub fn predict(&self, request: &PredictionRequest) -> Result<RatingPrediction> {
        let rating = self.normalize_and_predict(request)?;
        Ok(RatingPrediction::new(rating, self.model_name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predictor::RegressionModel;
    use crate::models::tree::RegressionTree;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Predictor that records every feature vector it sees
    struct RecordingPredictor {
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<Vec<f64>>>>,
        output: f64,
    }

    impl Predictor for RecordingPredictor {
        fn predict(&self, features: &[f64]) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(features.to_vec());
            Ok(self.output)
        }

        fn kind(&self) -> &'static str {
            "recording"
        }
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(EncodingTable::builtin().unwrap())
    }

    #[test]
    fn test_scenario_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let engine = InferenceEngine::with_predictor(
            extractor(),
            Box::new(RecordingPredictor {
                calls: calls.clone(),
                seen: seen.clone(),
                output: 3.8749,
            }),
            "recording",
            "test",
        );

        let prediction = engine.predict(&PredictionRequest::example()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            seen.lock().unwrap()[0],
            vec![1.0, 0.0, 120.0, 27.0, 11.0, 1.0, 500.0, 4.0]
        );
        assert_eq!(prediction.rating, 3.8749);
        assert_eq!(
            prediction.message(),
            "The predicted rating for the restaurant is: 3.87"
        );
    }

    #[test]
    fn test_invalid_input_skips_predictor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = InferenceEngine::with_predictor(
            extractor(),
            Box::new(RecordingPredictor {
                calls: calls.clone(),
                seen: Arc::new(Mutex::new(Vec::new())),
                output: 4.0,
            }),
            "recording",
            "test",
        );

        let mut request = PredictionRequest::example();
        request.online_orders = "Maybe".to_string();

        let err = engine.normalize_and_predict(&request).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_deterministic() {
        let engine = InferenceEngine::with_predictor(
            extractor(),
            Box::new(RegressionModel::Forest {
                trees: vec![
                    RegressionTree::stump(2, 100.0, 3.2, 4.1),
                    RegressionTree::stump(6, 800.0, 3.6, 4.4),
                ],
            }),
            "forest",
            "test",
        );

        let request = PredictionRequest::example();
        let first = engine.normalize_and_predict(&request).unwrap();
        let second = engine.normalize_and_predict(&request).unwrap();

        assert_eq!(first.to_bits(), second.to_bits());
        assert!((first - 3.85).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_output_is_prediction_error() {
        let engine = InferenceEngine::with_predictor(
            extractor(),
            Box::new(RecordingPredictor {
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
                output: f64::NAN,
            }),
            "recording",
            "test",
        );

        let err = engine
            .normalize_and_predict(&PredictionRequest::example())
            .unwrap_err();
        assert_eq!(err.kind(), "prediction");
    }

    #[test]
    fn test_wrong_feature_count() {
        let engine = InferenceEngine::with_predictor(
            extractor(),
            Box::new(RegressionModel::Forest {
                trees: vec![RegressionTree::leaf(4.0)],
            }),
            "forest",
            "test",
        );

        let err = engine.predict_features(&[1.0, 0.0]).unwrap_err();
        assert_eq!(err.kind(), "prediction");
    }

    #[test]
    fn test_missing_model_is_load_error() {
        let mut config = AppConfig::default();
        config.model.path = "/nonexistent/model.json.gz".to_string();

        let err = InferenceEngine::new(&config).err().unwrap();
        assert_eq!(err.kind(), "model_load");
    }
}
