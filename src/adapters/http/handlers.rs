//! HTTP handlers for the reading endpoints

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;

use crate::core::reading::{
    FailureClass, ReadingFailure, ReadingService, MISSING_FIELDS_MESSAGE,
};
use crate::domain::model::ReadingSubmission;

use super::dto::{AspectSummary, AspectsResponse, DrawResponse, ErrorResponse, ReadingResponse};

/// Shared application state
#[derive(Clone)]
pub struct ReadingAppState {
    pub service: Arc<ReadingService>,
}

impl ReadingAppState {
    pub fn new(service: Arc<ReadingService>) -> Self {
        Self { service }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(class: FailureClass) -> StatusCode {
    match class {
        FailureClass::BadRequest => StatusCode::BAD_REQUEST,
        FailureClass::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        FailureClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Draw three cards
///
/// GET /api/draw
pub async fn draw_cards(State(state): State<ReadingAppState>) -> Json<DrawResponse> {
    Json(DrawResponse {
        cards: state.service.draw().to_vec(),
    })
}

/// List the supported aspects
///
/// GET /api/aspects
pub async fn list_aspects(State(state): State<ReadingAppState>) -> Json<AspectsResponse> {
    let aspects = state
        .service
        .aspects()
        .aspects()
        .iter()
        .map(AspectSummary::from)
        .collect();
    Json(AspectsResponse { aspects })
}

/// Interpret a drawn spread
///
/// POST /api/reading
pub async fn create_reading(
    State(state): State<ReadingAppState>,
    payload: Result<Json<ReadingSubmission>, JsonRejection>,
) -> Result<Json<ReadingResponse>, ApiError> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::warn!("Rejected reading body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(MISSING_FIELDS_MESSAGE)),
        )
    })?;

    match state.service.perform(submission).await {
        Ok(interpretation) => Ok(Json(ReadingResponse { interpretation })),
        Err(e) => {
            let failure = ReadingFailure::from(&e);
            match failure.class {
                FailureClass::BadRequest => tracing::warn!("Reading rejected: {}", e),
                _ => tracing::error!(
                    "❌ Reading API error: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                ),
            }
            Err((
                status_for(failure.class),
                Json(ErrorResponse::new(failure.code, failure.message)),
            ))
        }
    }
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
