use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    Body(String),

    #[error("Could not retrieve a transcript for {video_id}: {message}")]
    Retrieval { video_id: String, message: String },

    #[error("No transcripts are available for video {0}")]
    NoTranscript(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TranscriptError>;

impl TranscriptError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranscriptError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TranscriptError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("Error: {message}");
        } else {
            tracing::warn!("Rejected request: {message}");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
