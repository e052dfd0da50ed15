//! Web UI and JSON API for rating predictions

pub mod handlers;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::metrics::PredictionMetrics;
use crate::models::inference::InferenceEngine;
use handlers::{healthz, index, metrics, predict_json, submit_form};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
    pub metrics: Arc<PredictionMetrics>,
}

impl AppState {
    pub fn new(engine: Arc<InferenceEngine>, metrics: Arc<PredictionMetrics>) -> Self {
        Self { engine, metrics }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(submit_form))
        .route("/api/predict", post(predict_json))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(app_state)
}
