use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, Json, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};

use crate::error::{RatingError, Result};
use crate::metrics::MetricsSnapshot;
use crate::types::rating::RatingPrediction;
use crate::types::request::PredictionRequest;
use crate::web::page::{self, Outcome};
use crate::web::AppState;

/// Raw form submission. Every field arrives as text; numbers are parsed
/// when converting into a [`PredictionRequest`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PredictionForm {
    pub online_orders: String,
    pub book_table: String,
    pub total_votes: String,
    pub restaurant_location: String,
    pub restaurant_type: String,
    pub cuisine_types: String,
    pub cost_for_two: String,
    pub restaurant_service: String,
}

impl PredictionForm {
    pub fn to_request(&self) -> Result<PredictionRequest> {
        Ok(PredictionRequest {
            online_orders: self.online_orders.clone(),
            book_table: self.book_table.clone(),
            total_votes: parse_integer("total_votes", &self.total_votes)?,
            restaurant_location: self.restaurant_location.clone(),
            restaurant_type: self.restaurant_type.clone(),
            cuisine_types: self.cuisine_types.clone(),
            cost_for_two: parse_integer("cost_for_two", &self.cost_for_two)?,
            restaurant_service: self.restaurant_service.clone(),
        })
    }
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| RatingError::invalid_input(field, format!("{:?} is not an integer", value)))
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub prediction: RatingPrediction,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for RatingError {
    fn into_response(self) -> Response {
        let code = match &self {
            RatingError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            RatingError::ModelLoad { .. } | RatingError::Prediction { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (code, Json(body)).into_response()
    }
}

/// Normalize, predict and record metrics for one request
fn run_prediction(state: &AppState, request: Result<PredictionRequest>) -> Result<RatingPrediction> {
    let start_time = Instant::now();

    match request.and_then(|request| state.engine.predict(&request)) {
        Ok(prediction) => {
            let processing_time = start_time.elapsed();
            state
                .metrics
                .record_prediction(processing_time, prediction.rating);
            info!(
                request_id = %prediction.request_id,
                rating = prediction.rating,
                processing_time_us = processing_time.as_micros(),
                "Prediction successful"
            );
            Ok(prediction)
        }
        Err(e) => {
            state.metrics.record_failure(e.kind());
            error!(kind = e.kind(), error = %e, "Prediction request failed");
            Err(e)
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(
        state.engine.extractor().encodings(),
        &PredictionForm::default(),
        &Outcome::Empty,
    ))
}

pub async fn submit_form(
    State(state): State<AppState>,
    payload: std::result::Result<Form<PredictionForm>, FormRejection>,
) -> Html<String> {
    let (form, request) = match payload {
        Ok(Form(form)) => {
            let request = form.to_request();
            (form, request)
        }
        Err(rejection) => (
            PredictionForm::default(),
            Err(RatingError::invalid_input("body", rejection.body_text())),
        ),
    };

    let outcome = match run_prediction(&state, request) {
        Ok(prediction) => Outcome::Rating(prediction.message()),
        Err(_) => Outcome::Error,
    };

    Html(page::render(
        state.engine.extractor().encodings(),
        &form,
        &outcome,
    ))
}

pub async fn predict_json(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    let request = payload
        .map(|Json(request)| request)
        .map_err(|rejection| RatingError::invalid_input("body", rejection.body_text()));
    let prediction = run_prediction(&state, request)?;
    let message = prediction.message();
    Ok(Json(PredictionResponse {
        prediction,
        message,
    }))
}

pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.engine.model_name(),
        "version": state.engine.model_version(),
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_form() -> PredictionForm {
        PredictionForm {
            online_orders: "Yes".to_string(),
            book_table: "No".to_string(),
            total_votes: " 120 ".to_string(),
            restaurant_location: "Indiranagar".to_string(),
            restaurant_type: "Cafe".to_string(),
            cuisine_types: "Chinese, Mughlai".to_string(),
            cost_for_two: "500".to_string(),
            restaurant_service: "Dine-out".to_string(),
        }
    }

    #[test]
    fn test_form_to_request() {
        let request = example_form().to_request().unwrap();
        assert_eq!(request, PredictionRequest::example());
    }

    #[test]
    fn test_form_non_numeric_votes() {
        let form = PredictionForm {
            total_votes: "lots".to_string(),
            ..example_form()
        };
        let err = form.to_request().unwrap_err();
        assert!(matches!(
            err,
            RatingError::InvalidInput { field: "total_votes", .. }
        ));
    }

    #[test]
    fn test_error_status_codes() {
        let response = RatingError::invalid_input("book_table", "bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = RatingError::prediction("nan").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
