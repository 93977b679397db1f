use axum::{
    extract::{rejection::JsonRejection, Json, State},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::TranscriptError,
    models::{TranscriptRequest, TranscriptResponse},
    transcript_processor::TranscriptService,
};

pub fn create_routes(service: TranscriptService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/transcript", post(get_transcript))
        .with_state(service)
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "Welcome to the backend API!" }))
}

async fn get_transcript(
    State(service): State<TranscriptService>,
    payload: Result<Json<TranscriptRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, TranscriptError> {
    let Json(req) = payload.map_err(|e| TranscriptError::Body(e.body_text()))?;
    let response = service.process_transcript_request(&req).await?;
    Ok(Json(response))
}
