//! Compressed model artifact loader

use crate::error::{RatingError, Result};
use crate::feature_extractor::FEATURE_NAMES;
use crate::models::predictor::{Predictor, RegressionModel};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Deserialized model artifact with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// Artifact version
    #[serde(default)]
    pub version: String,
    /// Feature columns the model was trained on, in input order
    pub feature_names: Vec<String>,
    /// The regression model itself
    pub model: RegressionModel,
}

/// Loader for gzip-compressed JSON model artifacts
pub struct ModelLoader {
    /// Feature columns the artifact must declare
    expected_features: Vec<String>,
}

impl ModelLoader {
    /// Create a loader expecting the restaurant feature columns
    pub fn new() -> Self {
        Self {
            expected_features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load and validate a model artifact from disk
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel> {
        let path = path.as_ref();
        let origin = path.display().to_string();

        info!(path = %origin, "Loading model artifact");

        let file = File::open(path).map_err(|e| RatingError::model_load(&origin, e.to_string()))?;
        let model = self.load_from_reader(file, &origin)?;

        info!(
            model = %model.name,
            version = %model.version,
            kind = model.model.kind(),
            trees = model.model.tree_count(),
            "Model loaded successfully"
        );

        Ok(model)
    }

    /// Decompress, deserialize and validate an artifact from any reader
    pub fn load_from_reader<R: Read>(&self, reader: R, origin: &str) -> Result<LoadedModel> {
        let mut buffer = Vec::new();
        GzDecoder::new(reader)
            .read_to_end(&mut buffer)
            .map_err(|e| RatingError::model_load(origin, format!("decompression failed: {}", e)))?;

        let model: LoadedModel = serde_json::from_slice(&buffer).map_err(|e| {
            RatingError::model_load(origin, format!("invalid model artifact: {}", e))
        })?;

        self.validate(&model)
            .map_err(|e| RatingError::model_load(origin, e))?;

        Ok(model)
    }

    fn validate(&self, model: &LoadedModel) -> std::result::Result<(), String> {
        if model.feature_names != self.expected_features {
            return Err(format!(
                "model features {:?} do not match expected {:?}",
                model.feature_names, self.expected_features
            ));
        }
        model.model.validate(self.expected_features.len())
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Gzip-compress a serialized artifact
pub fn compress_artifact(json: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json)?;
    encoder.finish()
}
