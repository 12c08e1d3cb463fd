use crate::backup::BackupError;
use crate::suggestions::SuggestionError;
use axum::{Json, http::StatusCode};
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<BackupError> for AppError {
    fn from(err: BackupError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<SuggestionError> for AppError {
    fn from(err: SuggestionError) -> Self {
        if matches!(err, SuggestionError::EmptyTopic) {
            Self::bad_request(err.to_string())
        } else {
            Self::service_unavailable(err.to_string())
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({ "ok": false, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}
